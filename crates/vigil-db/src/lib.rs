//! # vigil-db
//!
//! libSQL persistence for Vigil.
//!
//! Two stores share one database:
//! - the **analysis log**, an append-only table of `AnalysisResult`s keyed
//!   `analysis:<url>:<timestamp-millis>`; re-analyzing a URL adds a row and
//!   never overwrites one;
//! - **chat sessions**, one row per `chat:<sessionId>` holding the full
//!   session (messages plus analysis snapshot).
//!
//! Serialization of writes to one session is the caller's concern (the
//! engine runs one actor per session id); this crate only reads and writes
//! whole rows.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

pub use error::DatabaseError;

use libsql::Builder;

/// Database handle for the analysis log and chat sessions.
pub struct VigilDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl VigilDb {
    /// Open a local database at `path` (`":memory:"` for tests).
    ///
    /// Runs migrations on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let vigil_db = Self { db, conn };
        vigil_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(vigil_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> VigilDb {
        VigilDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in ["analyses", "chat_sessions"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }
}
