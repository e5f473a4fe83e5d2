//! Repository methods, implemented directly on [`crate::VigilDb`].

pub mod analysis;
pub mod chat;
