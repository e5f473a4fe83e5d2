//! # vigil-core
//!
//! Core types, persisted key layout, and error types for Vigil.
//!
//! This crate provides the foundational types shared across all Vigil crates:
//! - Entity structs for scripts, analyses, and chat sessions
//! - Risk and recommendation enums
//! - Storage key formatting helpers (`analysis:<url>:<ts>`, `chat:<id>`)
//! - Cross-cutting error types
//! - Response types returned by the calling layers

pub mod entities;
pub mod enums;
pub mod errors;
pub mod keys;
pub mod responses;
