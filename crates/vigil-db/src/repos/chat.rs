//! Chat session rows.

use vigil_core::entities::ChatSession;
use vigil_core::keys::chat_key;

use crate::VigilDb;
use crate::error::DatabaseError;
use crate::helpers::{decode_payload, encode_payload};

impl VigilDb {
    /// Insert or replace the session row for `session.session_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if serialization or the upsert fails.
    pub async fn save_chat_session(&self, session: &ChatSession) -> Result<(), DatabaseError> {
        let key = chat_key(&session.session_id);
        let payload = encode_payload(session)?;
        self.conn
            .execute(
                "INSERT INTO chat_sessions (key, session_id, payload, created_at, last_active_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(key) DO UPDATE SET \
                 payload = excluded.payload, \
                 created_at = excluded.created_at, \
                 last_active_at = excluded.last_active_at",
                libsql::params![
                    key.as_str(),
                    session.session_id.as_str(),
                    payload.as_str(),
                    session.created_at.to_rfc3339(),
                    session.last_active_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Load the session for `session_id`, or `None` if it was never created.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the payload is corrupt.
    pub async fn load_chat_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ChatSession>, DatabaseError> {
        let key = chat_key(session_id);
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM chat_sessions WHERE key = ?1",
                [key.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(decode_payload(&key, &row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vigil_core::entities::ChatMessage;

    async fn test_db() -> VigilDb {
        VigilDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn unknown_session_loads_none() {
        let db = test_db().await;
        assert!(db.load_chat_session("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_preserves_message_order() {
        let db = test_db().await;
        let mut session = ChatSession::new("s-1", None);
        session.push(ChatMessage::user("first"));
        session.push(ChatMessage::assistant("second"));
        db.save_chat_session(&session).await.unwrap();

        let loaded = db.load_chat_session("s-1").await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn save_overwrites_existing_row() {
        let db = test_db().await;
        let mut session = ChatSession::new("s-1", None);
        session.push(ChatMessage::user("old"));
        db.save_chat_session(&session).await.unwrap();

        let fresh = ChatSession::new("s-1", None);
        db.save_chat_session(&fresh).await.unwrap();

        let loaded = db.load_chat_session("s-1").await.unwrap().unwrap();
        assert!(loaded.messages.is_empty());

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM chat_sessions", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 1);
    }
}
