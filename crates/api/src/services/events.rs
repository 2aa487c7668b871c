//! Owner-scoped event operations.
//!
//! The owner is always the caller. Request bodies carry no owner field, so
//! whatever a client sends under that name is dropped at decode time, and
//! patch/delete are keyed by `(caller, event id)`.

use eardis_core::error::CoreError;
use eardis_core::identity::Identity;
use eardis_core::types::{DbId, Timestamp};
use eardis_core::validation::{validate_event_text, validate_event_title, validate_event_window};
use eardis_db::models::event::{Event, EventPatch, NewEvent};
use eardis_db::{EventStore, StoreError};
use serde::Deserialize;

use super::{bounded, unexpected};
use crate::state::AppState;

/// Request body for `POST /events`.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

/// Request body for `PATCH /events/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

pub async fn create_event(
    state: &AppState,
    identity: Identity,
    input: CreateEventRequest,
) -> Result<Event, CoreError> {
    validate_event_title(&input.title)?;
    validate_event_text("description", input.description.as_deref())?;
    validate_event_text("location", input.location.as_deref())?;
    validate_event_window(input.starts_at, input.ends_at)?;

    let new_event = NewEvent {
        owner_id: identity.user_id(),
        title: input.title,
        description: input.description,
        location: input.location,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
    };

    let event = bounded(state, state.store.create_event(&new_event))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => CoreError::NotFound("user not found".to_string()),
            other => unexpected("create_event", other),
        })?;

    tracing::info!(user_id = %identity, event_id = %event.id, "Event created");
    Ok(event)
}

pub async fn list_events(state: &AppState, identity: Identity) -> Result<Vec<Event>, CoreError> {
    bounded(state, state.store.list_events_by_owner(identity.user_id()))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => {
                tracing::warn!(user_id = %identity, "Listing events for unknown user");
                CoreError::NotFound("user not found".to_string())
            }
            other => unexpected("list_events", other),
        })
}

pub async fn patch_event(
    state: &AppState,
    identity: Identity,
    event_id: DbId,
    input: UpdateEventRequest,
) -> Result<Event, CoreError> {
    if let Some(title) = &input.title {
        validate_event_title(title)?;
    }
    validate_event_text("description", input.description.as_deref())?;
    validate_event_text("location", input.location.as_deref())?;
    validate_event_window(input.starts_at, input.ends_at)?;

    let patch = EventPatch {
        title: input.title,
        description: input.description,
        location: input.location,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
    };

    bounded(
        state,
        state.store.patch_event(identity.user_id(), event_id, &patch),
    )
    .await
    .map_err(|e| match e {
        StoreError::NotFound => {
            tracing::warn!(user_id = %identity, %event_id, "Patch on event not owned by caller");
            CoreError::Conflict("non-existent event, impossible to update".to_string())
        }
        // The merged window (stored start + new end, or the reverse) is only
        // known to the store.
        StoreError::Conflict(_) => {
            CoreError::Validation("event cannot end before it starts".to_string())
        }
        other => unexpected("patch_event", other),
    })
}

pub async fn delete_event(
    state: &AppState,
    identity: Identity,
    event_id: DbId,
) -> Result<(), CoreError> {
    bounded(state, state.store.delete_event(identity.user_id(), event_id))
        .await
        .map_err(|e| {
            tracing::warn!(user_id = %identity, %event_id, error = %e, "Event delete failed");
            CoreError::Conflict("impossible to delete the event".to_string())
        })?;

    tracing::info!(user_id = %identity, %event_id, "Event deleted");
    Ok(())
}
