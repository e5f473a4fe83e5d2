//! Append-only analysis log.

use chrono::{DateTime, Utc};

use vigil_core::entities::{AnalysisResult, StoredAnalysis};
use vigil_core::keys::{ANALYSIS_PREFIX, analysis_key};

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::{decode_payload, encode_payload, parse_datetime};

/// How many successive milliseconds are tried when a key is already taken.
const MAX_KEY_ATTEMPTS: i64 = 1_000;

const SELECT_COLUMNS: &str = "SELECT key, url, created_at, payload FROM analyses";

fn row_to_stored(row: &libsql::Row) -> Result<StoredAnalysis, DatabaseError> {
    let key: String = row.get(0)?;
    let url: String = row.get(1)?;
    let created_at = parse_datetime(&row.get::<String>(2)?)?;
    let result: AnalysisResult = decode_payload(&key, &row.get::<String>(3)?)?;
    Ok(StoredAnalysis {
        key,
        url,
        created_at,
        result,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<StoredAnalysis>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_stored(&row)?);
    }
    Ok(out)
}

impl VigilDb {
    /// Append `result` to the log under `analysis:<url>:<now-millis>`.
    ///
    /// Two stores of the same URL within one millisecond get distinct keys:
    /// the timestamp is advanced until an unused key is found.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails or no free key is found.
    pub async fn store_analysis(&self, result: &AnalysisResult) -> Result<String, DatabaseError> {
        self.store_analysis_at(result, Utc::now()).await
    }

    /// [`Self::store_analysis`] with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails or no free key is found.
    pub async fn store_analysis_at(
        &self,
        result: &AnalysisResult,
        now: DateTime<Utc>,
    ) -> Result<String, DatabaseError> {
        let payload = encode_payload(result)?;
        let created_at = now.to_rfc3339();
        let base_ms = now.timestamp_millis();

        for offset in 0..MAX_KEY_ATTEMPTS {
            let ms = base_ms + offset;
            let key = analysis_key(&result.url, ms);
            let inserted = self
                .conn
                .execute(
                    "INSERT OR IGNORE INTO analyses (key, url, created_ms, created_at, payload) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    libsql::params![
                        key.as_str(),
                        result.url.as_str(),
                        ms,
                        created_at.as_str(),
                        payload.as_str()
                    ],
                )
                .await?;
            if inserted == 1 {
                tracing::debug!(%key, "analysis stored");
                return Ok(key);
            }
        }
        Err(DatabaseError::InvalidState(format!(
            "no free analysis key for {} near {base_ms}",
            result.url
        )))
    }

    /// Every stored analysis, oldest first.
    ///
    /// Full scan by key prefix with no pagination.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is corrupt.
    pub async fn retrieve_analyses(&self) -> Result<Vec<StoredAnalysis>, DatabaseError> {
        let rows = self
            .conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE key LIKE ?1 ORDER BY created_ms, key"),
                [format!("{ANALYSIS_PREFIX}:%")],
            )
            .await?;
        collect(rows).await
    }

    /// Every stored analysis of `url`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is corrupt.
    pub async fn analyses_for_url(&self, url: &str) -> Result<Vec<StoredAnalysis>, DatabaseError> {
        let rows = self
            .conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE url = ?1 ORDER BY created_ms, key"),
                [url],
            )
            .await?;
        collect(rows).await
    }

    /// Most recent analysis of `url`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is corrupt.
    pub async fn latest_analysis_for(
        &self,
        url: &str,
    ) -> Result<Option<StoredAnalysis>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE url = ?1 ORDER BY created_ms DESC, key DESC LIMIT 1"),
                [url],
            )
            .await?;
        rows.next().await?.as_ref().map(row_to_stored).transpose()
    }

    /// Analysis stored under exactly `key`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is corrupt.
    pub async fn get_analysis(&self, key: &str) -> Result<Option<StoredAnalysis>, DatabaseError> {
        let mut rows = self
            .conn
            .query(&format!("{SELECT_COLUMNS} WHERE key = ?1"), [key])
            .await?;
        rows.next().await?.as_ref().map(row_to_stored).transpose()
    }

    /// Delete analyses created before `cutoff`. Returns the number removed.
    ///
    /// This is the only way a log entry ever disappears.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn prune_analyses(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM analyses WHERE created_ms < ?1",
                [cutoff.timestamp_millis()],
            )
            .await?;
        tracing::info!(deleted, cutoff = %cutoff, "analyses pruned");
        Ok(deleted)
    }
}
