use crate::markup::{ extract_segments, Segment };
use crate::models::chat::{ ChatMessage, Role };
use chrono::{ DateTime, Utc };
use serde::Serialize;
use uuid::Uuid;

/// A message as handed to the front end. Model messages carry their parsed
/// segments so links can be rendered as in-app navigation.
#[derive(Clone, Debug, Serialize)]
pub struct MessageView {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        let segments = match message.role {
            Role::Model => Some(extract_segments(&message.text)),
            Role::User => None,
        };
        MessageView {
            id: message.id,
            role: message.role,
            text: message.text.clone(),
            timestamp: message.timestamp,
            segments,
        }
    }
}
