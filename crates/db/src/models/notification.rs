//! Notification entity model and DTOs.

use eardis_core::notification::{NotificationKind, NotificationStatus};
use eardis_core::types::{DbId, Timestamp};
use serde::Serialize;

/// A notification addressed to `recipient_id`.
///
/// Serialized with the wire names `type`, `from` and `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: DbId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "from")]
    pub sender_id: DbId,
    #[serde(rename = "to")]
    pub recipient_id: DbId,
    pub status: NotificationStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// DTO for a new friend request. `sender_id` is the caller's identity.
#[derive(Debug, Clone)]
pub struct NewFriendRequest {
    pub sender_id: DbId,
    pub recipient_id: DbId,
}
