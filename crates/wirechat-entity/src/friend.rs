//! Friend and friend-request entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::PublicUser;

/// Status of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    /// Awaiting a response from the receiver.
    Pending,
    /// Accepted by the receiver.
    Accepted,
    /// Rejected by the receiver.
    Rejected,
}

/// A confirmed friendship edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    /// Friendship record identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// The befriended user.
    pub friend_id: Uuid,
    /// When the friendship was established.
    pub created_at: DateTime<Utc>,
    /// The befriended user's profile.
    pub friend: PublicUser,
}

/// A friend request between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Request identifier.
    pub id: Uuid,
    /// The user who sent the request.
    pub sender_id: Uuid,
    /// The user the request was sent to.
    pub receiver_id: Uuid,
    /// Current status.
    pub status: FriendRequestStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
    /// Sender profile, present on incoming requests.
    pub sender: Option<PublicUser>,
    /// Receiver profile, present on outgoing requests.
    pub receiver: Option<PublicUser>,
}
