//! Account operations: registration, login, self-service profile access.

use eardis_core::error::CoreError;
use eardis_core::identity::Identity;
use eardis_core::validation::{validate_email, validate_password, validate_username};
use eardis_db::models::user::{NewUser, User, UserResponse};
use eardis_db::{AccountStore, StoreError};
use serde::{Deserialize, Serialize};

use super::{bounded, unexpected};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "invalid credentials";
const ACCOUNT_NOT_FOUND: &str = "account does not exist";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /accounts`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /login`. `login` is an email or a username.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Request body for `POST /users/search`.
#[derive(Debug, Deserialize)]
pub struct SearchUserRequest {
    pub email: String,
}

/// Returned by registration and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Register a new account and issue its first token.
///
/// The password is hashed with a fresh salt before anything reaches the
/// store. A duplicate email or username is reported without saying which.
pub async fn create_account(
    state: &AppState,
    input: RegisterRequest,
) -> Result<AuthResponse, CoreError> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password(&input.password)?;

    let hashed = hash_password(&input.password)
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))?;

    let new_user = NewUser {
        username: input.username,
        email: input.email,
        password_hash: hashed.hash,
        salt: hashed.salt,
    };

    let user = bounded(state, state.store.create_user(&new_user))
        .await
        .map_err(|e| match e {
            StoreError::Conflict(constraint) => {
                tracing::info!(%constraint, "Registration rejected by uniqueness constraint");
                CoreError::Conflict("email or username already used".to_string())
            }
            other => unexpected("create_account", other),
        })?;

    tracing::info!(user_id = %user.id, "Account created");
    issue_session(state, &user)
}

/// Verify credentials and issue a token.
///
/// An unknown login and a wrong password produce the same error.
pub async fn login(state: &AppState, input: LoginRequest) -> Result<AuthResponse, CoreError> {
    let login = input.login.trim();
    if login.is_empty() || input.password.is_empty() {
        return Err(CoreError::Validation(
            "login and password are required".to_string(),
        ));
    }

    let user = bounded(state, state.store.find_user_by_login(login))
        .await
        .map_err(|e| unexpected("login", e))?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    issue_session(state, &user)
}

/// The caller's own profile.
pub async fn get_account(state: &AppState, identity: Identity) -> Result<UserResponse, CoreError> {
    bounded(state, state.store.find_user_by_id(identity.user_id()))
        .await
        .map_err(|e| unexpected("get_account", e))?
        .map(|user| UserResponse::from(&user))
        .ok_or_else(|| CoreError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
}

/// Delete the caller's own account. There is no way to delete anyone else's.
pub async fn delete_account(state: &AppState, identity: Identity) -> Result<(), CoreError> {
    bounded(state, state.store.delete_user(identity.user_id()))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => CoreError::NotFound(ACCOUNT_NOT_FOUND.to_string()),
            other => unexpected("delete_account", other),
        })?;

    tracing::info!(user_id = %identity, "Account deleted");
    Ok(())
}

/// Look up another user's public profile by exact email.
pub async fn search_account(
    state: &AppState,
    identity: Identity,
    input: SearchUserRequest,
) -> Result<UserResponse, CoreError> {
    if input.email.is_empty() {
        return Err(CoreError::Validation("email is required".to_string()));
    }

    let found = bounded(state, state.store.find_user_by_email(&input.email))
        .await
        .map_err(|e| unexpected("search_account", e))?;

    tracing::debug!(user_id = %identity, found = found.is_some(), "Account search");
    found
        .map(|user| UserResponse::from(&user))
        .ok_or_else(|| CoreError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
}

/// Public profiles of everyone the caller is friends with.
pub async fn list_friends(
    state: &AppState,
    identity: Identity,
) -> Result<Vec<UserResponse>, CoreError> {
    let friends = bounded(state, state.store.list_friends(identity.user_id()))
        .await
        .map_err(|e| match e {
            StoreError::NotFound => CoreError::NotFound("user not found".to_string()),
            other => unexpected("list_friends", other),
        })?;
    Ok(friends.iter().map(UserResponse::from).collect())
}

fn issue_session(state: &AppState, user: &User) -> Result<AuthResponse, CoreError> {
    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| CoreError::Internal(format!("Token generation failed: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::services::test_support::{register, state};
    use assert_matches::assert_matches;

    fn registration(name: &str) -> RegisterRequest {
        RegisterRequest {
            username: name.to_string(),
            email: format!("{name}@test.com"),
            password: "password-123".to_string(),
        }
    }

    #[tokio::test]
    async fn registered_account_can_log_in() {
        let state = state();
        let created = create_account(&state, registration("alice")).await.unwrap();

        let session = login(
            &state,
            LoginRequest {
                login: "alice@test.com".to_string(),
                password: "password-123".to_string(),
            },
        )
        .await
        .unwrap();

        let claims = validate_token(&session.token, &state.config.jwt).unwrap();
        let identity = Identity::from_claims(&claims).unwrap();
        assert_eq!(identity.user_id(), created.user.id);
    }

    #[tokio::test]
    async fn login_ignores_surrounding_whitespace() {
        let state = state();
        let created = create_account(&state, registration("alice")).await.unwrap();

        let session = login(
            &state,
            LoginRequest {
                login: "  alice \n".to_string(),
                password: "password-123".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(session.user.id, created.user.id);
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let state = state();
        let created = create_account(&state, registration("alice")).await.unwrap();

        let user = state
            .store
            .find_user_by_id(created.user.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "password-123");
        assert!(user.password_hash.contains(&user.salt));
    }

    #[tokio::test]
    async fn duplicate_field_is_not_revealed() {
        let state = state();
        create_account(&state, registration("alice")).await.unwrap();

        let same_email = RegisterRequest {
            username: "alice2".to_string(),
            ..registration("alice")
        };
        let err = create_account(&state, same_email).await.unwrap_err();
        assert_matches!(&err, CoreError::Conflict(msg) if msg == "email or username already used");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let state = state();
        create_account(&state, registration("alice")).await.unwrap();

        let unknown = login(
            &state,
            LoginRequest {
                login: "nobody".to_string(),
                password: "password-123".to_string(),
            },
        )
        .await
        .unwrap_err();
        let wrong = login(
            &state,
            LoginRequest {
                login: "alice".to_string(),
                password: "not-the-password".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_matches!(unknown, CoreError::Unauthorized(_));
    }

    #[tokio::test]
    async fn search_is_exact_email_match() {
        let state = state();
        let alice = register(&state, "alice").await;
        register(&state, "bob").await;

        let found = search_account(
            &state,
            alice,
            SearchUserRequest {
                email: "bob@test.com".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(found.username, "bob");

        assert_matches!(
            search_account(
                &state,
                alice,
                SearchUserRequest {
                    email: "BOB@test.com".to_string()
                }
            )
            .await,
            Err(CoreError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn deleted_account_is_gone() {
        let state = state();
        let alice = register(&state, "alice").await;

        delete_account(&state, alice).await.unwrap();
        assert_matches!(get_account(&state, alice).await, Err(CoreError::NotFound(_)));
        assert_matches!(delete_account(&state, alice).await, Err(CoreError::NotFound(_)));
    }
}
