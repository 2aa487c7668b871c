//! `users` and `friendships` queries.

use async_trait::async_trait;
use eardis_core::types::DbId;
use uuid::Uuid;

use super::{classify_write_error, PgStore};
use crate::models::user::{NewUser, User};
use crate::store::{AccountStore, StoreError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, salt, created_at, updated_at";

#[async_trait]
impl AccountStore for PgStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, salt)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.salt)
            .fetch_one(self.pool())
            .await
            .map_err(classify_write_error)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 OR username = $1 LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: DbId) -> Result<(), StoreError> {
        // Events, notifications and friendships go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_friends(&self, id: DbId) -> Result<Vec<User>, StoreError> {
        self.ensure_user_exists(id).await?;
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.password_hash, u.salt, u.created_at, u.updated_at
             FROM friendships f
             JOIN users u
               ON (f.user_low = $1 AND u.id = f.user_high)
               OR (f.user_high = $1 AND u.id = f.user_low)
             ORDER BY u.username",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;
        Ok(users)
    }
}
