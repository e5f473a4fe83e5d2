//! # vigil-schema
//!
//! JSON Schema generation, validation, and registry for Vigil.
//!
//! Entity types are defined in `vigil-core` with `#[derive(JsonSchema)]`.
//! This crate builds the schemas once, validates untrusted JSON against them
//! (oracle classification payloads above all), and exports them for
//! `vgl schema`.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::{CLASSIFICATION_PAYLOAD, SchemaRegistry};
