//! Database migration runner.
//!
//! SQL is embedded at compile time; every statement uses `IF NOT EXISTS`
//! so opening an existing database re-runs it harmlessly.

use crate::VigilDb;
use crate::error::DatabaseError;

/// Analysis log and chat session tables.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl VigilDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
