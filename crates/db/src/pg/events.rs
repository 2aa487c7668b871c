//! `events` queries. Every statement is keyed by the owner.

use async_trait::async_trait;
use eardis_core::types::DbId;
use uuid::Uuid;

use super::{classify_write_error, PgStore};
use crate::models::event::{Event, EventPatch, NewEvent};
use crate::store::{EventStore, StoreError};

const COLUMNS: &str = "id, owner_id, title, description, location, starts_at, ends_at, \
                       created_at, updated_at";

#[async_trait]
impl EventStore for PgStore {
    async fn create_event(&self, input: &NewEvent) -> Result<Event, StoreError> {
        let query = format!(
            "INSERT INTO events (id, owner_id, title, description, location, starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(Uuid::new_v4())
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(self.pool())
            .await
            .map_err(classify_write_error)
    }

    async fn list_events_by_owner(&self, owner_id: DbId) -> Result<Vec<Event>, StoreError> {
        self.ensure_user_exists(owner_id).await?;
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE owner_id = $1
             ORDER BY starts_at ASC NULLS LAST, created_at ASC"
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .bind(owner_id)
            .fetch_all(self.pool())
            .await?;
        Ok(events)
    }

    async fn patch_event(
        &self,
        owner_id: DbId,
        event_id: DbId,
        input: &EventPatch,
    ) -> Result<Event, StoreError> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_optional(self.pool())
            .await
            .map_err(classify_write_error)?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_event(&self, owner_id: DbId, event_id: DbId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(event_id)
            .bind(owner_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
