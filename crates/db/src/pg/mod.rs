//! PostgreSQL store adapter.
//!
//! Queries are split per table the way repositories are elsewhere in the
//! codebase: [`accounts`], [`events`] and [`notifications`] each implement one
//! store port for [`PgStore`].

use async_trait::async_trait;
use eardis_core::types::DbId;
use sqlx::PgPool;

use crate::store::{Store, StoreError};

mod accounts;
mod events;
mod notifications;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for check constraint violations.
const CHECK_VIOLATION: &str = "23514";

/// Store backed by a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// [`StoreError::NotFound`] unless a user with `id` exists.
    async fn ensure_user_exists(&self, id: DbId) -> Result<(), StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Classify a sqlx error raised by a write.
///
/// - Unique violations map to [`StoreError::Conflict`] carrying the constraint name.
/// - Foreign key violations map to [`StoreError::NotFound`]: the referenced
///   user does not exist.
/// - Check violations map to [`StoreError::Conflict`].
/// - Everything else stays a [`StoreError::Database`].
pub(crate) fn classify_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::Conflict(constraint),
            Some(FOREIGN_KEY_VIOLATION) => return StoreError::NotFound,
            Some(CHECK_VIOLATION) => return StoreError::Conflict(constraint),
            _ => {}
        }
    }
    StoreError::Database(err)
}
