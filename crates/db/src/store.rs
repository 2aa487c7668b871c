//! Store ports.
//!
//! The API layer only talks to persistence through these traits, held as
//! `Arc<dyn Store>`. Every method that touches an owned resource takes the
//! owner or recipient id explicitly; adapters must scope their queries by it.

use async_trait::async_trait;
use eardis_core::types::DbId;

use crate::models::event::{Event, EventPatch, NewEvent};
use crate::models::notification::{NewFriendRequest, Notification};
use crate::models::user::{NewUser, User};

/// Failures reported by a store adapter.
///
/// These never reach the wire directly; the service layer maps each one to a
/// caller-safe domain error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the (scoped) lookup.
    #[error("record not found")]
    NotFound,

    /// A uniqueness or relationship constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The notification exists but has already left the pending state.
    #[error("notification already resolved")]
    AlreadyResolved,

    /// A stored value could not be mapped back into a domain type.
    #[error("invalid stored value: {0}")]
    InvalidData(String),

    /// The store did not answer within the configured deadline.
    #[error("store call timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a user. Duplicate email or username yields [`StoreError::Conflict`].
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Find a user whose email or username equals `login`.
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// Exact, case-sensitive email match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Delete a user together with their events, notifications and friendships.
    async fn delete_user(&self, id: DbId) -> Result<(), StoreError>;

    /// Users that share a friendship with `id`, ordered by username.
    async fn list_friends(&self, id: DbId) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, input: &NewEvent) -> Result<Event, StoreError>;

    /// Events owned by `owner_id`. [`StoreError::NotFound`] if the owner
    /// itself does not exist.
    async fn list_events_by_owner(&self, owner_id: DbId) -> Result<Vec<Event>, StoreError>;

    /// Patch the event keyed by `(owner_id, event_id)`.
    /// [`StoreError::NotFound`] when no such pair exists.
    async fn patch_event(
        &self,
        owner_id: DbId,
        event_id: DbId,
        input: &EventPatch,
    ) -> Result<Event, StoreError>;

    /// Delete the event keyed by `(owner_id, event_id)`.
    async fn delete_event(&self, owner_id: DbId, event_id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// All notifications addressed to `recipient_id`, newest first.
    /// [`StoreError::NotFound`] if the recipient does not exist.
    async fn list_notifications_for(
        &self,
        recipient_id: DbId,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Persist a pending friend request.
    ///
    /// [`StoreError::NotFound`] if the recipient is unknown;
    /// [`StoreError::Conflict`] if a request between the pair is already
    /// pending or the two users are already friends.
    async fn create_friend_request(
        &self,
        input: &NewFriendRequest,
    ) -> Result<Notification, StoreError>;

    /// Move a pending friend request addressed to `recipient_id` to
    /// `accepted` and record the friendship.
    async fn accept_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError>;

    /// Move a pending friend request addressed to `recipient_id` to `declined`.
    async fn decline_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError>;
}

/// The full persistence surface used by the API.
#[async_trait]
pub trait Store: AccountStore + EventStore + NotificationStore {
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Order two user ids the way friendships are keyed.
pub fn friendship_key(a: DbId, b: DbId) -> (DbId, DbId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
