//! Entity structs for all Vigil domain objects.
//!
//! Wire-facing structs use `camelCase` field names, matching the JSON shapes
//! exchanged with calling layers and persisted in the store. All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and
//! schema validation.

mod analysis;
mod chat;
mod classification;
mod script;

pub use analysis::{AnalysisRecord, AnalysisResult, StoredAnalysis};
pub use chat::{ChatMessage, ChatSession};
pub use classification::ClassificationPayload;
pub use script::ScriptRecord;
