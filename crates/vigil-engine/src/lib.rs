//! # vigil-engine
//!
//! The decision logic and stateful parts of Vigil.
//!
//! - [`host`]: host extraction and the first-party rule.
//! - [`resolver`]: the tiered chain turning one script URL into one verdict
//!   (first-party, framework marker, known-service registry, oracle,
//!   fallback). It never fails.
//! - [`batch`]: first-party filtering, the K bound, and concurrent
//!   resolution reassembled in discovery order.
//! - [`context`]: renders an analysis into bounded prompt text.
//! - [`session`]: one actor per chat session id; all operations on a
//!   session are serialized through it.
//! - [`render`]: the page renderer contract and its adapters.
//! - [`Vigil`]: the facade exposing `analyze`, `chat`, and
//!   `init_chat_session` to calling layers.

pub mod batch;
pub mod context;
mod error;
pub mod host;
pub mod render;
pub mod resolver;
mod service;
pub mod session;

pub use batch::BatchOrchestrator;
pub use context::ContextBuilder;
pub use error::EngineError;
pub use render::{HttpRenderer, RenderError, RenderedPage, Renderer, StaticRenderer};
pub use resolver::{Resolution, Resolver};
pub use service::Vigil;
pub use session::SessionStore;
