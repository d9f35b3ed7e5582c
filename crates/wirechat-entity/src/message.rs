//! Message entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::PublicUser;

/// Kind of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Plain text.
    Text,
    /// Image attachment.
    Image,
    /// Generic file attachment.
    File,
    /// Audio attachment.
    Audio,
    /// Video attachment.
    Video,
    /// Server-generated system message.
    System,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: Uuid,
    /// The conversation this message belongs to.
    pub conversation_id: Option<Uuid>,
    /// Text content; absent for pure attachments.
    pub content: Option<String>,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
    /// The sender; absent for system messages.
    pub sender: Option<PublicUser>,
}

/// Payload to send a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    /// Target conversation.
    pub conversation_id: Uuid,
    /// Text content.
    pub content: String,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: MessageType,
}
