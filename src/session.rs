use crate::api::{Transport, TransportError};
use crate::gateway::{BotReply, Gateway, GatewayError, MODELS_PATH, ROUTE_PATH};
use crate::models::Message;
use crate::state::{Phase, SessionState};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Reply shown in place of any failed exchange. The underlying error is only logged.
pub const FAILURE_REPLY: &str = "Er ging iets mis, probeer het later opnieuw";

struct Inner {
    state: SessionState,
    // Bumped by reset(); settlements from an older generation are dropped
    generation: u64,
}

/// Owns the conversation state of one chat session and is the only thing that mutates it.
///
/// Every operation takes `&self`. The state lock is never held across an await, so a
/// caller can issue a second operation while the first one is still waiting on the
/// backend and have it rejected by the `pending` guard.
pub struct ChatSession {
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    inner: Mutex<Inner>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_transport(Some(transport))
    }

    /// A session whose transport may be missing. Every operation then fails the
    /// same way a transport error would.
    pub fn with_transport(transport: Option<Arc<dyn Transport>>) -> Self {
        Self {
            transport,
            timeout: None,
            inner: Mutex::new(Inner {
                state: SessionState::new(),
                generation: 0,
            }),
        }
    }

    /// Bounds every backend call. Without this a hung backend keeps the session pending.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The state is plain data, a panic elsewhere cannot leave it half-updated
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Accessors ---

    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock().state.draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.lock().state.draft.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().state.log.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().state.pending
    }

    pub fn phase(&self) -> Phase {
        self.lock().state.phase
    }

    pub fn available_models(&self) -> Vec<String> {
        self.lock().state.available_models.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Restores the freshly seeded state. Anything still in flight settles into the void.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = SessionState::new();
        log::info!("Session reset (generation {})", inner.generation);
    }

    // --- Operations ---

    /// Sends the current draft as a question.
    ///
    /// Does nothing when the draft is blank or another operation is pending. Otherwise the
    /// trimmed draft is logged as a user message, the draft is cleared, and the backend's
    /// answer (or [`FAILURE_REPLY`]) is logged as a bot message once the call settles.
    pub async fn send_message(&self) {
        let (question, generation) = {
            let mut inner = self.lock();
            if inner.state.pending {
                log::debug!("send_message ignored: session is {:?}", inner.state.phase);
                return;
            }
            let question = inner.state.draft.trim().to_string();
            if question.is_empty() {
                return;
            }

            inner.state.push(Message::user(question.clone()));
            inner.state.draft.clear();
            inner.state.begin(Phase::Sending);
            (question, inner.generation)
        };
        let _pending = PendingGuard {
            session: self,
            generation,
        };

        let reply = match self.ask(&question).await {
            Ok(reply) => Message::bot(reply.into_value()),
            Err(e) => {
                log::error!("Failed to get an answer from {}: {}", ROUTE_PATH, e);
                Message::bot(FAILURE_REPLY)
            }
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            log::warn!("Discarding reply for a session that was reset");
            return;
        }
        inner.state.push(reply);
    }

    /// Replaces the model list with what the backend currently offers.
    ///
    /// Guarded like [`send_message`](Self::send_message): a refresh requested while any
    /// operation is pending is ignored, so two refreshes can never race on the list.
    /// On failure the list is emptied and the error is logged; the chat log is untouched.
    pub async fn refresh_models(&self) {
        let generation = {
            let mut inner = self.lock();
            if inner.state.pending {
                log::debug!("refresh_models ignored: session is {:?}", inner.state.phase);
                return;
            }
            inner.state.begin(Phase::Refreshing);
            inner.generation
        };
        let _pending = PendingGuard {
            session: self,
            generation,
        };

        let outcome = self.list_models().await;

        let mut inner = self.lock();
        if inner.generation != generation {
            log::warn!("Discarding model list for a session that was reset");
            return;
        }
        match outcome {
            Ok(models) => {
                log::info!("Available models: {:?}", models);
                inner.state.available_models = models;
            }
            Err(e) => {
                log::error!("Failed to get available models: {}", e);
                inner.state.available_models.clear();
            }
        }
    }

    async fn ask(&self, question: &str) -> Result<BotReply, GatewayError> {
        let transport = self.transport.as_deref().ok_or(TransportError::Unavailable)?;
        let gateway = Gateway::new(transport);
        self.bounded(ROUTE_PATH, gateway.ask(question)).await
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let transport = self.transport.as_deref().ok_or(TransportError::Unavailable)?;
        let gateway = Gateway::new(transport);
        self.bounded(MODELS_PATH, gateway.list_models()).await
    }

    async fn bounded<T>(
        &self,
        path: &str,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| TransportError::Timeout {
                    path: path.to_string(),
                    elapsed: limit,
                })?,
            None => call.await,
        }
    }
}

// Clears `pending` when an operation ends, including when its future is dropped early.
struct PendingGuard<'a> {
    session: &'a ChatSession,
    generation: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        if inner.generation == self.generation {
            inner.state.settle();
        }
    }
}
