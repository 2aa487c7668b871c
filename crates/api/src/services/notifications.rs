//! Notification dispatch and the friend-request workflow.
//!
//! Inbound envelopes are matched exhaustively on [`NotificationKind`]; the
//! `Unknown` arm is where any tag this server does not handle ends up, and it
//! is always rejected. The sender of a notification is the caller, never a
//! body field.

use eardis_core::error::CoreError;
use eardis_core::identity::Identity;
use eardis_core::notification::{NotificationKind, Reply};
use eardis_core::types::DbId;
use eardis_db::models::notification::{NewFriendRequest, Notification};
use eardis_db::{NotificationStore, StoreError};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{bounded, unexpected};
use crate::state::AppState;

const INVALID_TYPE: &str = "invalid notification type";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /notifications`: a type tag plus a type-specific body.
#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

/// Body of a `friend_request` notification.
#[derive(Debug, Deserialize)]
struct FriendRequestBody {
    to: DbId,
}

/// Request body for `POST /notifications/{id}`.
#[derive(Debug, Deserialize)]
pub struct NotificationReply {
    pub notification_type: NotificationKind,
    /// Optional; when present it must match the id in the path.
    pub notification_id: Option<DbId>,
    pub response: bool,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list_notifications(
    state: &AppState,
    identity: Identity,
) -> Result<Vec<Notification>, CoreError> {
    bounded(state, state.store.list_notifications_for(identity.user_id()))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => CoreError::NotFound("user not found".to_string()),
            other => unexpected("list_notifications", other),
        })
}

pub async fn send_notification(
    state: &AppState,
    identity: Identity,
    envelope: SendNotificationRequest,
) -> Result<Notification, CoreError> {
    match envelope.kind {
        NotificationKind::FriendRequest => send_friend_request(state, identity, envelope.body).await,
        NotificationKind::Unknown => Err(CoreError::Validation(INVALID_TYPE.to_string())),
    }
}

async fn send_friend_request(
    state: &AppState,
    identity: Identity,
    body: Map<String, Value>,
) -> Result<Notification, CoreError> {
    let body: FriendRequestBody = serde_json::from_value(Value::Object(body)).map_err(|e| {
        tracing::debug!(error = %e, "Undecodable friend request body");
        CoreError::Validation("friend request needs a valid 'to' user id".to_string())
    })?;

    if body.to == identity.user_id() {
        return Err(CoreError::Validation(
            "cannot send a friend request to yourself".to_string(),
        ));
    }

    let request = NewFriendRequest {
        sender_id: identity.user_id(),
        recipient_id: body.to,
    };

    let notification = bounded(state, state.store.create_friend_request(&request))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => CoreError::NotFound("user does not exist".to_string()),
            StoreError::Conflict(reason) => {
                tracing::info!(user_id = %identity, to = %body.to, %reason, "Friend request refused");
                CoreError::Conflict(
                    "a friend request is already pending or you are already friends".to_string(),
                )
            }
            other => unexpected("send_friend_request", other),
        })?;

    tracing::info!(
        notification_id = %notification.id,
        from = %identity,
        to = %body.to,
        "Friend request sent"
    );
    Ok(notification)
}

/// Answer a notification addressed to the caller.
///
/// The store only finds notifications by `(id, caller)`, so replying to
/// someone else's notification is indistinguishable from replying to a
/// missing or already answered one.
pub async fn reply_to_notification(
    state: &AppState,
    identity: Identity,
    notification_id: DbId,
    reply: NotificationReply,
) -> Result<Notification, CoreError> {
    if reply
        .notification_id
        .is_some_and(|body_id| body_id != notification_id)
    {
        return Err(CoreError::Validation(
            "notification_id does not match the path".to_string(),
        ));
    }

    match reply.notification_type {
        NotificationKind::FriendRequest => {
            let recipient = identity.user_id();
            let result = match Reply::from_response(reply.response) {
                Reply::Accept => {
                    bounded(
                        state,
                        state.store.accept_friend_request(notification_id, recipient),
                    )
                    .await
                }
                Reply::Decline => {
                    bounded(
                        state,
                        state.store.decline_friend_request(notification_id, recipient),
                    )
                    .await
                }
            };

            let notification = result.map_err(|e| {
                tracing::warn!(user_id = %identity, %notification_id, error = %e, "Reply rejected");
                CoreError::Conflict("notification does not exist".to_string())
            })?;

            tracing::info!(
                user_id = %identity,
                %notification_id,
                status = notification.status.as_str(),
                "Friend request answered"
            );
            Ok(notification)
        }
        NotificationKind::Unknown => Err(CoreError::Validation(INVALID_TYPE.to_string())),
    }
}
