//! Central schema registry for all Vigil wire types.
//!
//! The `SchemaRegistry` builds JSON Schemas from vigil-core types at
//! construction time using [`schemars::schema_for!`], compiles a validator
//! for each, and provides validation via `jsonschema`.

use std::collections::HashMap;

use jsonschema::Validator;
use schemars::schema_for;

use crate::error::SchemaError;

/// Name of the schema oracle classification replies are validated against.
pub const CLASSIFICATION_PAYLOAD: &str = "classification_payload";

struct Entry {
    schema: serde_json::Value,
    validator: Validator,
}

/// Central store of all JSON Schemas in the Vigil system.
pub struct SchemaRegistry {
    entries: HashMap<&'static str, Entry>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value` and compiling its validator.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        let schema = serde_json::to_value(schema_for!($ty))
            .expect("schemars output is always serializable");
        let validator = jsonschema::validator_for(&schema)
            .expect("schemars output is always a valid schema");
        $map.insert($name, Entry { schema, validator });
    };
}

impl SchemaRegistry {
    /// Build a new registry containing all entity and response schemas.
    ///
    /// # Panics
    ///
    /// Panics if a `schemars`-generated schema fails to serialize or compile.
    /// This is not expected in practice because `schemars` always produces
    /// valid JSON Schema.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = HashMap::new();

        // --- Entities (7) ---
        register!(entries, "script_record", vigil_core::entities::ScriptRecord);
        register!(
            entries,
            "analysis_record",
            vigil_core::entities::AnalysisRecord
        );
        register!(
            entries,
            "analysis_result",
            vigil_core::entities::AnalysisResult
        );
        register!(
            entries,
            "stored_analysis",
            vigil_core::entities::StoredAnalysis
        );
        register!(entries, "chat_message", vigil_core::entities::ChatMessage);
        register!(entries, "chat_session", vigil_core::entities::ChatSession);
        register!(
            entries,
            CLASSIFICATION_PAYLOAD,
            vigil_core::entities::ClassificationPayload
        );

        // --- Responses (5) ---
        register!(entries, "chat_reply", vigil_core::responses::ChatReply);
        register!(
            entries,
            "init_session_response",
            vigil_core::responses::InitSessionResponse
        );
        register!(entries, "chat_history", vigil_core::responses::ChatHistory);
        register!(
            entries,
            "analysis_summary",
            vigil_core::responses::AnalysisSummary
        );
        register!(
            entries,
            "prune_response",
            vigil_core::responses::PruneResponse
        );

        Self { entries }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.entries.get(name).map(|entry| &entry.schema)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let errors: Vec<String> = entry
            .validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
