//! Notification kinds and the reply state machine.
//!
//! A notification is the sole carrier of a relationship transition. Each one
//! starts [`NotificationStatus::Pending`] and moves exactly once to a
//! terminal status when its recipient replies.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Wire and storage tag of a friend-request notification.
pub const KIND_FRIEND_REQUEST: &str = "friend_request";

/// Closed set of notification kinds.
///
/// Any tag the server does not know deserializes to [`NotificationKind::Unknown`]
/// so dispatchers can reject it explicitly instead of failing inside serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequest => KIND_FRIEND_REQUEST,
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored kind. Unknown values are an error here: rows are only
    /// ever written with a known kind.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_FRIEND_REQUEST => Ok(Self::FriendRequest),
            other => Err(CoreError::Validation(format!(
                "invalid notification type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_DECLINED: &str = "declined";

/// Lifecycle of a notification.
///
/// ```text
/// Pending --accept--> Accepted
/// Pending --decline-> Declined
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Accepted,
    Declined,
}

/// A recipient's answer to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Accept,
    Decline,
}

impl Reply {
    /// Map the boolean `response` field of a reply envelope.
    pub fn from_response(response: bool) -> Self {
        if response {
            Self::Accept
        } else {
            Self::Decline
        }
    }
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Accepted => STATUS_ACCEPTED,
            Self::Declined => STATUS_DECLINED,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_ACCEPTED => Ok(Self::Accepted),
            STATUS_DECLINED => Ok(Self::Declined),
            other => Err(CoreError::Validation(format!(
                "invalid notification status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply a reply. Only `Pending` accepts a reply; terminal statuses
    /// reject every further transition with [`CoreError::Conflict`].
    pub fn transition(self, reply: Reply) -> Result<Self, CoreError> {
        if self.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "notification already {}",
                self.as_str()
            )));
        }
        Ok(match reply {
            Reply::Accept => Self::Accepted,
            Reply::Decline => Self::Declined,
        })
    }
}
