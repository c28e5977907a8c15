use super::{ ChatSession, SessionError, TurnState };
use crate::agent::ResponseGenerator;
use crate::models::chat::ChatMessage;
use log::{ debug, error, info };
use std::collections::HashMap;
use std::sync::{ Arc, RwLock, RwLockReadGuard, RwLockWriteGuard };
use std::time::{ Duration, Instant };
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct SessionEntry {
    handle: Arc<Mutex<ChatSession>>,
    last_active: Instant,
}

type SessionMap = HashMap<Uuid, SessionEntry>;

/// Live chat sessions for the HTTP surface, keyed by conversation id.
/// Nothing is persisted; removing or evicting a session discards its
/// conversation.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<SessionMap>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> (Uuid, Arc<Mutex<ChatSession>>) {
        let session = ChatSession::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.write().insert(id, SessionEntry { handle: handle.clone(), last_active: Instant::now() });
        info!("Opened chat session {}", id);
        (id, handle)
    }

    /// Looks a session up and marks it active.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<ChatSession>>> {
        let mut sessions = self.write();
        let entry = sessions.get_mut(id)?;
        entry.last_active = Instant::now();
        Some(entry.handle.clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            info!("Closed chat session {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one full turn for session `id`. The session lock is released while
    /// the model call is in flight, so concurrent submissions see `Busy`
    /// instead of queueing behind it. Generation and the return to Idle run
    /// in their own task, so the turn still completes if the caller is
    /// dropped; the reply is then kept in the conversation but not returned.
    pub async fn submit(
        &self,
        id: &Uuid,
        text: &str,
        generator: Arc<ResponseGenerator>
    ) -> Result<(ChatMessage, ChatMessage), SessionError> {
        let handle = self.get(id).ok_or(SessionError::NotFound(*id))?;

        let pending = handle.lock().await.begin_turn(text)?;
        debug!("Session {} awaiting reply ({} prior turns)", id, pending.prior_history.len());

        let registry = self.clone();
        let session_id = *id;
        let turn = tokio::spawn(async move {
            let reply = generator.generate(&pending.prior_history, &pending.text).await;
            let model_message = handle.lock().await.complete_turn(reply)?.clone();
            registry.touch(&session_id);
            Ok::<_, SessionError>((pending.user_message, model_message))
        });

        turn.await.map_err(|e| {
            error!("Chat turn task for session {} failed: {}", id, e);
            SessionError::Interrupted
        })?
    }

    /// Drops sessions idle for at least `max_idle`. Sessions with a reply
    /// still outstanding are kept. Returns how many were evicted.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|id, entry| {
            if entry.last_active.elapsed() < max_idle {
                return true;
            }
            match entry.handle.try_lock() {
                Ok(session) if session.state() == TurnState::Idle => {
                    debug!("Evicting idle chat session {}", id);
                    false
                }
                _ => true,
            }
        });
        before - sessions.len()
    }

    /// Periodically evicts sessions idle for longer than `max_idle`.
    pub fn spawn_sweeper(&self, every: Duration, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle);
                if evicted > 0 {
                    info!("Evicted {} idle chat sessions ({} remain)", evicted, registry.len());
                }
            }
        })
    }

    fn touch(&self, id: &Uuid) {
        if let Some(entry) = self.write().get_mut(id) {
            entry.last_active = Instant::now();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionMap> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionMap> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
