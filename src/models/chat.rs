use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use std::fmt;
use uuid::Uuid;

pub const GREETING: &str =
    "Hello! I am a customer care agent for Dynamic RMC LTD. How can I help you today regarding our services? You can ask me any question.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{role, text}` projection of a message that is handed to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, text: String) -> Self {
        Self { id: Uuid::new_v4(), role, text, timestamp: Utc::now() }
    }

    pub fn turn(&self) -> Turn {
        Turn { role: self.role, text: self.text.clone() }
    }
}

/// Append-only message log for one chat view. Messages are never edited,
/// removed or reordered once pushed.
#[derive(Clone, Debug, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::new(Role::Model, GREETING.to_string())],
        }
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, text.into()));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.messages.iter().map(ChatMessage::turn).collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_single_model_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        let first = &conversation.messages()[0];
        assert_eq!(first.role, Role::Model);
        assert_eq!(first.text, GREETING);
    }

    #[test]
    fn append_preserves_prior_messages_and_order() {
        let mut conversation = Conversation::new();
        let before = conversation.messages().to_vec();

        conversation.append(Role::User, "Where is your office?");
        conversation.append(Role::Model, "We are in Surulere, Lagos.");

        assert_eq!(conversation.len(), before.len() + 2);
        assert_eq!(&conversation.messages()[..before.len()], &before[..]);
        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Model, Role::User, Role::Model]);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut conversation = Conversation::new();
        for i in 0..10 {
            conversation.append(Role::User, format!("message {}", i));
        }
        let mut ids: Vec<Uuid> = conversation.messages().iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), conversation.len());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }
}
