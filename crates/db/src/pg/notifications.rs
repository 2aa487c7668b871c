//! `notifications` queries and the friend-request transitions.

use async_trait::async_trait;
use eardis_core::notification::{NotificationKind, NotificationStatus, Reply};
use eardis_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use super::{classify_write_error, PgStore};
use crate::models::notification::{NewFriendRequest, Notification};
use crate::store::{friendship_key, NotificationStore, StoreError};

const COLUMNS: &str = "id, kind, sender_id, recipient_id, status, created_at, resolved_at";

/// Raw `notifications` row; kind and status are stored as text.
#[derive(Debug, FromRow)]
struct NotificationRow {
    id: DbId,
    kind: String,
    sender_id: DbId,
    recipient_id: DbId,
    status: String,
    created_at: Timestamp,
    resolved_at: Option<Timestamp>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&row.kind)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let status = NotificationStatus::parse(&row.status)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        Ok(Self {
            id: row.id,
            kind,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            status,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

/// Lock both users' rows, lower id first.
///
/// Creating a request and resolving one both take this lock before reading
/// the pair's friendship or pending state, so those reads cannot go stale
/// before the transaction commits. `FOR NO KEY UPDATE` leaves foreign key
/// checks from other tables unblocked.
async fn lock_pair(conn: &mut PgConnection, a: DbId, b: DbId) -> Result<(), StoreError> {
    let (low, high) = friendship_key(a, b);
    sqlx::query("SELECT id FROM users WHERE id IN ($1, $2) ORDER BY id FOR NO KEY UPDATE")
        .bind(low)
        .bind(high)
        .fetch_all(conn)
        .await?;
    Ok(())
}

impl PgStore {
    /// Apply `reply` to a pending friend request addressed to `recipient_id`.
    ///
    /// The pair lock is taken before the notification row lock, in the same
    /// order [`NotificationStore::create_friend_request`] takes it. Concurrent
    /// replies to the same notification serialize on the row lock; the loser
    /// observes a terminal status and gets [`StoreError::AlreadyResolved`].
    async fn resolve_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
        reply: Reply,
    ) -> Result<Notification, StoreError> {
        let mut tx = self.pool().begin().await?;

        let sender_id: DbId = sqlx::query_scalar(
            "SELECT sender_id FROM notifications
             WHERE id = $1 AND recipient_id = $2 AND kind = $3",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .bind(NotificationKind::FriendRequest.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;
        lock_pair(&mut *tx, sender_id, recipient_id).await?;

        let current: Option<(String, DbId)> = sqlx::query_as(
            "SELECT status, sender_id FROM notifications
             WHERE id = $1 AND recipient_id = $2 AND kind = $3
             FOR UPDATE",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .bind(NotificationKind::FriendRequest.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let (status, sender_id) = current.ok_or(StoreError::NotFound)?;
        let status = NotificationStatus::parse(&status)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let next = status
            .transition(reply)
            .map_err(|_| StoreError::AlreadyResolved)?;

        let query = format!(
            "UPDATE notifications SET status = $2, resolved_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(notification_id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        if next == NotificationStatus::Accepted {
            let (low, high) = friendship_key(sender_id, recipient_id);
            sqlx::query(
                "INSERT INTO friendships (user_low, user_high) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(low)
            .bind(high)
            .execute(&mut *tx)
            .await
            .map_err(classify_write_error)?;
        }

        tx.commit().await?;
        Notification::try_from(row)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list_notifications_for(
        &self,
        recipient_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        self.ensure_user_exists(recipient_id).await?;
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE recipient_id = $1
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(recipient_id)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn create_friend_request(
        &self,
        input: &NewFriendRequest,
    ) -> Result<Notification, StoreError> {
        let kind = NotificationKind::FriendRequest.as_str();
        let mut tx = self.pool().begin().await?;
        lock_pair(&mut *tx, input.sender_id, input.recipient_id).await?;

        let (low, high) = friendship_key(input.sender_id, input.recipient_id);
        let already_friends: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM friendships WHERE user_low = $1 AND user_high = $2)",
        )
        .bind(low)
        .bind(high)
        .fetch_one(&mut *tx)
        .await?;
        if already_friends {
            return Err(StoreError::Conflict("already friends".to_string()));
        }

        // An open request in either direction is rejected by
        // uq_notifications_pending_pair on insert.
        let query = format!(
            "INSERT INTO notifications (id, kind, sender_id, recipient_id, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(Uuid::new_v4())
            .bind(kind)
            .bind(input.sender_id)
            .bind(input.recipient_id)
            .bind(NotificationStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(classify_write_error)?;

        tx.commit().await?;
        Notification::try_from(row)
    }

    async fn accept_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError> {
        self.resolve_friend_request(notification_id, recipient_id, Reply::Accept)
            .await
    }

    async fn decline_friend_request(
        &self,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<Notification, StoreError> {
        self.resolve_friend_request(notification_id, recipient_id, Reply::Decline)
            .await
    }
}
