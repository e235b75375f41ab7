//! # Session Manager Module
//!
//! Registry of live pagination sessions keyed by session id, plus the
//! idle-expiry watchdog spawned alongside each session. Removal from the
//! registry is the single termination point: whichever of the explicit
//! clear or the watchdog removes the session first also deletes the
//! owned message, so cleanup happens exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::MessageId;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::session::PaginationSession;

/// Thread-safe registry of live pagination sessions.
///
/// Each session lives behind its own async mutex, so transitions for one
/// session are serialized while independent sessions progress freely.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Arc<AsyncMutex<PaginationSession>>>>,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Register a session and spawn its idle watchdog.
    ///
    /// The watchdog sleeps until the current idle deadline and re-checks
    /// on wakeup; a qualifying interaction in the meantime pushes the
    /// deadline back (the idle window restarts on each qualifying event).
    pub fn register(self: &Arc<Self>, bot: Bot, session_id: String, session: PaginationSession) {
        let handle = Arc::new(AsyncMutex::new(session));
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.clone(), Arc::clone(&handle));
        debug!(session_id = %session_id, "Pagination session registered");

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.watch_idle(bot, session_id, handle).await;
        });
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<AsyncMutex<PaginationSession>>> {
        self.sessions.lock().unwrap().get(session_id).map(Arc::clone)
    }

    /// Remove a session from the registry. The first caller wins; a
    /// clear racing the watchdog gets `None` on the losing side.
    pub fn remove(&self, session_id: &str) -> Option<Arc<AsyncMutex<PaginationSession>>> {
        self.sessions.lock().unwrap().remove(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    async fn watch_idle(
        &self,
        bot: Bot,
        session_id: String,
        handle: Arc<AsyncMutex<PaginationSession>>,
    ) {
        loop {
            let deadline = { handle.lock().await.last_event() } + self.idle_timeout;
            tokio::time::sleep_until(deadline.into()).await;

            if self.get(&session_id).is_none() {
                // Cleared explicitly in the meantime
                return;
            }

            let (chat_id, message_id, idle_elapsed) = {
                let session = handle.lock().await;
                (
                    session.chat_id(),
                    session.message_id(),
                    session.last_event().elapsed(),
                )
            };

            if idle_elapsed >= self.idle_timeout {
                if self.remove(&session_id).is_some() {
                    info!(session_id = %session_id, "Pagination session expired after idle timeout");
                    delete_session_message(&bot, chat_id, message_id).await;
                }
                return;
            }
            // A qualifying interaction moved the deadline; sleep again
        }
    }
}

/// Delete a session's owned message. Termination cleanup is not retried:
/// a message already gone or a transport error is logged and swallowed.
pub async fn delete_session_message(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    match bot.delete_message(chat_id, message_id).await {
        Ok(_) => debug!(chat_id = %chat_id, "Session message deleted"),
        Err(e) => {
            warn!(chat_id = %chat_id, error = %e, "Failed to delete session message during termination")
        }
    }
}
