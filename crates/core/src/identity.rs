//! Caller identity derived from a verified token's claim set.
//!
//! An [`Identity`] can only be produced by [`Identity::from_claims`], so every
//! operation that takes one is guaranteed a non-empty, well-formed user id.
//! Signature and expiry checks happen before this point; extraction only
//! looks at the claim shape.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::DbId;

/// Claim key carrying the user id.
pub const ID_CLAIM: &str = "id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    user_id: DbId,
}

impl Identity {
    /// Extract the caller identity from a verified claim set.
    ///
    /// Fails with [`CoreError::Unauthorized`] when the `id` claim is absent,
    /// is not a string, is empty, or is not a valid user id.
    pub fn from_claims(claims: &Map<String, Value>) -> Result<Self, CoreError> {
        let raw = match claims.get(ID_CLAIM) {
            None => {
                return Err(CoreError::Unauthorized(
                    "token is missing the id claim".to_string(),
                ))
            }
            Some(Value::String(s)) => s.trim(),
            Some(_) => {
                return Err(CoreError::Unauthorized(
                    "token id claim must be a string".to_string(),
                ))
            }
        };

        if raw.is_empty() {
            return Err(CoreError::Unauthorized(
                "token id claim is empty".to_string(),
            ));
        }

        let user_id = raw.parse::<DbId>().map_err(|_| {
            CoreError::Unauthorized("token id claim is not a valid user id".to_string())
        })?;

        if user_id.is_nil() {
            return Err(CoreError::Unauthorized(
                "token id claim is not a valid user id".to_string(),
            ));
        }

        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> DbId {
        self.user_id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_id)
    }
}
