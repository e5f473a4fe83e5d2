//! Chat session store: one actor per session id.
//!
//! Every operation on a session is a [`Command`] sent to that session's
//! actor, which owns the session state and processes commands one at a
//! time. Operations on one session are therefore totally ordered, while
//! different sessions proceed independently with no shared mutable state.
//!
//! A chat turn runs entirely inside the actor (user append, responder,
//! assistant append), so two turns on the same session never interleave.
//!
//! Actors load their state from the database on first use, write through
//! after every mutation, and exit after `idle` without commands. The next
//! command respawns them from storage.

mod actor;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use vigil_core::entities::{AnalysisResult, ChatMessage};
use vigil_core::responses::{ChatHistory, ChatReply};
use vigil_db::VigilDb;

use crate::error::EngineError;
use actor::{Command, SessionActor};

/// What a chat turn's responder sees: the session snapshot, the prior
/// turns (bounded by the history window), and the new message.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub analysis: Option<AnalysisResult>,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Produces the assistant reply for one turn. Must not fail.
pub type Responder = Box<dyn FnOnce(TurnInput) -> BoxFuture<'static, String> + Send>;

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

struct Slot {
    generation: u64,
    tx: mpsc::UnboundedSender<Command>,
}

pub(crate) struct Inner {
    db: Arc<VigilDb>,
    slots: DashMap<String, Slot>,
    next_generation: AtomicU64,
    idle: Duration,
    history_window: usize,
}

/// Handle to the session actors. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    #[must_use]
    pub fn new(db: Arc<VigilDb>, idle: Duration, history_window: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                slots: DashMap::new(),
                next_generation: AtomicU64::new(0),
                idle,
                history_window,
            }),
        }
    }

    /// Create or overwrite the session, discarding any prior messages.
    ///
    /// # Errors
    ///
    /// `EngineError::Storage` if the new session could not be written; the
    /// previous state is kept in that case.
    pub async fn init(
        &self,
        session_id: &str,
        snapshot: Option<AnalysisResult>,
    ) -> Result<(), EngineError> {
        self.request(session_id, |reply| Command::Init { snapshot, reply })
            .await
    }

    /// Append one message.
    ///
    /// # Errors
    ///
    /// `EngineError::SessionNotFound` if the session was never initialized.
    pub async fn append(&self, session_id: &str, message: ChatMessage) -> Result<(), EngineError> {
        self.request(session_id, |reply| Command::Append { message, reply })
            .await
    }

    /// Messages and snapshot of the session; empty for unknown sessions.
    ///
    /// # Errors
    ///
    /// `EngineError::Storage` if the session could not be loaded.
    pub async fn history(&self, session_id: &str) -> Result<ChatHistory, EngineError> {
        self.request(session_id, |reply| Command::History { reply })
            .await
    }

    /// Run a complete chat turn inside the session's actor.
    ///
    /// # Errors
    ///
    /// `EngineError::SessionNotFound` if the session was never initialized;
    /// the responder is not called in that case.
    pub async fn turn(
        &self,
        session_id: &str,
        message: String,
        responder: Responder,
    ) -> Result<ChatReply, EngineError> {
        self.request(session_id, |reply| Command::Turn {
            message,
            responder,
            reply,
        })
        .await
    }

    /// Number of live session actors.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.inner.slots.len()
    }

    async fn request<T>(
        &self,
        session_id: &str,
        make: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(session_id, make(tx));
        rx.await.map_err(|_| EngineError::SessionUnavailable {
            session_id: session_id.to_string(),
        })?
    }

    /// Deliver `cmd` to the session's actor, spawning one if needed.
    ///
    /// The send happens under the map entry lock, which is what lets an
    /// idle actor remove itself without losing a command in flight.
    fn dispatch(&self, session_id: &str, cmd: Command) {
        let mut slot = self
            .inner
            .slots
            .entry(session_id.to_string())
            .or_insert_with(|| spawn(&self.inner, session_id));
        if let Err(mpsc::error::SendError(cmd)) = slot.tx.send(cmd) {
            tracing::warn!(session = session_id, "session actor died, respawning");
            *slot = spawn(&self.inner, session_id);
            // A fresh receiver is alive; if this still fails the reply
            // sender is dropped and the caller sees SessionUnavailable.
            let _ = slot.tx.send(cmd);
        }
    }
}

fn spawn(inner: &Arc<Inner>, session_id: &str) -> Slot {
    let generation = inner.next_generation.fetch_add(1, Ordering::Relaxed);
    let (tx, rx) = mpsc::unbounded_channel();
    let actor = SessionActor::new(session_id, Arc::clone(&inner.db), inner.history_window);
    tokio::spawn(actor.run(rx, Arc::downgrade(inner), generation, inner.idle));
    tracing::debug!(session = session_id, generation, "session actor spawned");
    Slot { generation, tx }
}
