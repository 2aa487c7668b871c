/// Domain error taxonomy shared by every layer above the store.
///
/// Messages carried here are caller-safe: they are projected to the wire
/// as-is, so the underlying cause of a failure must be logged by whoever
/// builds the error rather than embedded in it.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or undecodable input, or an unrecognized type tag.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, invalid or malformed caller identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A referenced user or target does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Ownership mismatch, stale notification reply, or uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The caller-facing message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_prefix() {
        let err = CoreError::Conflict("impossible to delete the event".into());
        assert_eq!(err.to_string(), "Conflict: impossible to delete the event");
    }

    #[test]
    fn message_strips_prefix() {
        let err = CoreError::NotFound("user not found".into());
        assert_eq!(err.message(), "user not found");
    }
}
