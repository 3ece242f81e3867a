//! Error taxonomy for reconciliation operations.
//!
//! The distinctions matter: `NotFound` is the signal that a resource is safe
//! to create, `Conflict` must never be retried automatically, and everything
//! else propagates to the caller untouched.

use std::io;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, validating, or pushing resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The queried identity does not exist remotely.
    #[error("not found")]
    NotFound,

    /// A create/update collided with an existing, differently-identified
    /// object. Carries the original transport status and raw response body.
    #[error("conflict: HTTP {status}: {body}")]
    Conflict {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, surfaced verbatim for diagnostics.
        body: String,
    },

    /// A local precondition failed before any remote call was made.
    #[error("invalid resource '{uid}': {reason}")]
    Validation {
        /// Identity of the offending resource.
        uid: String,
        /// Why validation rejected it.
        reason: String,
    },

    /// No handler is registered for the resource's kind.
    #[error("no handler registered for kind '{0}'")]
    UnknownKind(String),

    /// Network failure or unexpected HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// HTTP status code if one was received.
        status: Option<u16>,
    },

    /// A declaration or response body failed to decode.
    #[error("malformed resource: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while locating or reading declarations.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a conflict error from a transport response.
    pub fn conflict(status: u16, body: impl Into<String>) -> Self {
        Self::Conflict {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Transport {
            message: message.into(),
            status,
        }
    }

    /// Create a validation error for a resource.
    pub fn validation(uid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            uid: uid.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the resource is absent remotely
    /// (and therefore safe to create).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether retrying the whole reconciliation step is reasonable.
    ///
    /// Only transport failures qualify; update idempotence makes the retry
    /// safe. Conflicts are never retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguished() {
        let err = Error::NotFound;
        assert!(err.is_not_found());
        assert!(!err.is_retryable());

        let err = Error::transport("connection refused", None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_conflict_carries_status_and_body() {
        let err = Error::conflict(409, "data source with the same name already exists");
        match err {
            Error::Conflict { status, body } => {
                assert_eq!(status, 409);
                assert!(body.contains("already exists"));
            }
            _ => panic!("expected Error::Conflict"),
        }
    }

    #[test]
    fn test_conflict_is_not_retryable() {
        let err = Error::conflict(409, "duplicate");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transport_is_retryable() {
        let err = Error::transport("HTTP 502", Some(502));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_display() {
        let err = Error::validation("my-dashboard", "uid 'other' and name 'my-dashboard' don't match");
        let display = format!("{}", err);
        assert!(display.contains("my-dashboard"));
        assert!(display.contains("don't match"));
    }

    #[test]
    fn test_unknown_kind_display() {
        let err = Error::UnknownKind("Playlist".to_string());
        assert!(format!("{}", err).contains("Playlist"));
    }
}
