//! The per-session actor.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use vigil_core::entities::{AnalysisResult, ChatMessage, ChatSession};
use vigil_core::responses::{ChatHistory, ChatReply};
use vigil_db::VigilDb;

use super::{Inner, Reply, Responder, TurnInput};
use crate::error::EngineError;

pub(crate) enum Command {
    Init {
        snapshot: Option<AnalysisResult>,
        reply: Reply<()>,
    },
    Append {
        message: ChatMessage,
        reply: Reply<()>,
    },
    History {
        reply: Reply<ChatHistory>,
    },
    Turn {
        message: String,
        responder: Responder,
        reply: Reply<ChatReply>,
    },
}

pub(crate) struct SessionActor {
    session_id: String,
    db: Arc<VigilDb>,
    history_window: usize,
    /// `None` until loaded; `Some(None)` means no such session.
    state: Option<Option<ChatSession>>,
}

async fn persist(db: &VigilDb, session: &ChatSession) {
    if let Err(e) = db.save_chat_session(session).await {
        tracing::warn!(session = %session.session_id, error = %e, "chat session write failed");
    }
}

impl SessionActor {
    pub(crate) fn new(session_id: &str, db: Arc<VigilDb>, history_window: usize) -> Self {
        Self {
            session_id: session_id.to_string(),
            db,
            history_window,
            state: None,
        }
    }

    pub(crate) async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Command>,
        inner: Weak<Inner>,
        generation: u64,
        idle: Duration,
    ) {
        loop {
            match tokio::time::timeout(idle, rx.recv()).await {
                Ok(Some(cmd)) => self.handle(cmd).await,
                Ok(None) => break,
                Err(_) => {
                    let Some(inner) = inner.upgrade() else { break };
                    // Senders only send while holding this entry's lock, so an
                    // empty queue checked under the same lock stays empty.
                    let removed = inner
                        .slots
                        .remove_if(&self.session_id, |_, slot| {
                            slot.generation == generation && rx.is_empty()
                        })
                        .is_some();
                    if removed || rx.is_empty() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(session = %self.session_id, generation, "session actor stopped");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Init { snapshot, reply } => {
                let _ = reply.send(self.init(snapshot).await);
            }
            Command::Append { message, reply } => {
                let _ = reply.send(self.append(message).await);
            }
            Command::History { reply } => {
                let _ = reply.send(self.history().await);
            }
            Command::Turn {
                message,
                responder,
                reply,
            } => {
                let _ = reply.send(self.turn(message, responder).await);
            }
        }
    }

    async fn loaded(&mut self) -> Result<&mut Option<ChatSession>, EngineError> {
        let state = match self.state.take() {
            Some(state) => state,
            None => self.db.load_chat_session(&self.session_id).await?,
        };
        Ok(self.state.insert(state))
    }

    fn not_found(&self) -> EngineError {
        EngineError::SessionNotFound {
            session_id: self.session_id.clone(),
        }
    }

    async fn init(&mut self, snapshot: Option<AnalysisResult>) -> Result<(), EngineError> {
        let session = ChatSession::new(self.session_id.clone(), snapshot);
        self.db.save_chat_session(&session).await?;
        self.state = Some(Some(session));
        tracing::info!(session = %self.session_id, "chat session initialized");
        Ok(())
    }

    async fn append(&mut self, message: ChatMessage) -> Result<(), EngineError> {
        let db = Arc::clone(&self.db);
        let not_found = self.not_found();
        let Some(session) = self.loaded().await?.as_mut() else {
            return Err(not_found);
        };
        session.push(message);
        persist(&db, session).await;
        Ok(())
    }

    async fn history(&mut self) -> Result<ChatHistory, EngineError> {
        Ok(self
            .loaded()
            .await?
            .as_ref()
            .map_or_else(ChatHistory::default, |s| ChatHistory {
                messages: s.messages.clone(),
                analysis_data: s.analysis_data.clone(),
            }))
    }

    async fn turn(
        &mut self,
        message: String,
        responder: Responder,
    ) -> Result<ChatReply, EngineError> {
        let db = Arc::clone(&self.db);
        let window = self.history_window;
        let not_found = self.not_found();
        let Some(session) = self.loaded().await?.as_mut() else {
            return Err(not_found);
        };

        let input = TurnInput {
            analysis: session.analysis_data.clone(),
            history: session.recent(window).to_vec(),
            message: message.clone(),
        };
        session.push(ChatMessage::user(message));
        persist(&db, session).await;

        let answer = ChatMessage::assistant(responder(input).await);
        let reply = ChatReply {
            reply: answer.content.clone(),
            timestamp: answer.timestamp,
        };
        session.push(answer);
        persist(&db, session).await;
        Ok(reply)
    }
}
