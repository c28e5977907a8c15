mod registry;

pub use registry::SessionRegistry;

use crate::models::chat::{ ChatMessage, Conversation, Role, Turn };
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A reply is still being generated for this conversation")]
    Busy,
    #[error("No reply is pending for this conversation")]
    NotAwaiting,
    #[error("Unknown chat session {0}")]
    NotFound(Uuid),
    #[error("The reply could not be generated")]
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// What the caller needs to run generation outside the session lock.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub prior_history: Vec<Turn>,
    pub text: String,
    pub user_message: ChatMessage,
}

/// One visitor's chat view: the conversation plus the Idle/AwaitingResponse
/// gate that keeps at most one generation outstanding.
#[derive(Debug)]
pub struct ChatSession {
    conversation: Conversation,
    state: TurnState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self { conversation: Conversation::new(), state: TurnState::Idle }
    }

    pub fn id(&self) -> Uuid {
        self.conversation.id
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Idle → AwaitingResponse. The user message is appended and the history
    /// that preceded it is returned for the generator.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SessionError> {
        if self.state != TurnState::Idle {
            return Err(SessionError::Busy);
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let prior_history = self.conversation.turns();
        let user_message = self.conversation.append(Role::User, text).clone();
        self.state = TurnState::AwaitingResponse;

        Ok(PendingTurn { prior_history, text: text.to_string(), user_message })
    }

    /// AwaitingResponse → Idle, appending the model reply.
    pub fn complete_turn(&mut self, reply: impl Into<String>) -> Result<&ChatMessage, SessionError> {
        if self.state != TurnState::AwaitingResponse {
            return Err(SessionError::NotAwaiting);
        }
        self.state = TurnState::Idle;
        Ok(self.conversation.append(Role::Model, reply))
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
