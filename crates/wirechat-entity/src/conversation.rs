//! Conversation entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;
use crate::user::PublicUser;

/// Whether a conversation is one-to-one or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    /// One-to-one conversation.
    Direct,
    /// Multi-member group conversation.
    Group,
}

/// Role of a member inside a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// The member who created the conversation.
    Owner,
    /// Elevated member.
    Admin,
    /// Regular member.
    Member,
}

/// A conversation summary as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation identifier.
    pub id: Uuid,
    /// Direct or group.
    #[serde(rename = "type")]
    pub kind: ConversationType,
    /// Group name; absent for direct conversations.
    pub name: Option<String>,
    /// Group description.
    pub description: Option<String>,
    /// Group avatar URL.
    pub avatar_url: Option<String>,
    /// The user who created the conversation.
    pub created_by: Option<Uuid>,
    /// Timestamp of the most recent message.
    pub last_message_at: Option<DateTime<Utc>>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated.
    pub updated_at: DateTime<Utc>,
    /// The most recent message, if any.
    pub last_message: Option<Message>,
}

/// A member row inside a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMember {
    /// Membership record identifier.
    pub id: Uuid,
    /// The conversation.
    pub conversation_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// Member role.
    pub role: MemberRole,
    /// Optional per-conversation nickname.
    pub nickname: Option<String>,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
    /// When the member left, if they have.
    pub left_at: Option<DateTime<Utc>>,
    /// Member profile.
    pub user: PublicUser,
}

/// A conversation with its full member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationWithMembers {
    /// The conversation summary.
    #[serde(flatten)]
    pub conversation: Conversation,
    /// All current members.
    pub members: Vec<ConversationMember>,
    /// Unread message count for the requesting user.
    pub unread_count: Option<u64>,
}

/// Payload to create a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversation {
    /// Direct or group.
    #[serde(rename = "type")]
    pub kind: ConversationType,
    /// Group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Initial member user IDs (excluding the creator).
    pub member_ids: Vec<Uuid>,
}
