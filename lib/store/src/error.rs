//! Error types for the store crate.
//!
//! Errors are designed for layered context using rootcause: callers wrap a
//! `Report<StoreError>` with their own operation context via `.context()`.

use std::fmt;

/// Errors from document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A path was malformed.
    InvalidPath { path: String, reason: String },
    /// A record could not be encoded as a JSON object.
    InvalidRecord { reason: String },
    /// A stored document did not match the expected shape.
    Decode { path: String, reason: String },
    /// The backend could not be reached or rejected the call.
    Unavailable { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { path, reason } => {
                write!(f, "invalid path '{path}': {reason}")
            }
            Self::InvalidRecord { reason } => write!(f, "invalid record: {reason}"),
            Self::Decode { path, reason } => {
                write!(f, "failed to decode document {path}: {reason}")
            }
            Self::Unavailable { reason } => write!(f, "backend unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_display() {
        let err = StoreError::InvalidPath {
            path: "chats//messages".to_string(),
            reason: "empty segment".to_string(),
        };
        assert!(err.to_string().contains("chats//messages"));
        assert!(err.to_string().contains("empty segment"));
    }

    #[test]
    fn decode_display() {
        let err = StoreError::Decode {
            path: "users/a@x.com".to_string(),
            reason: "missing field `email`".to_string(),
        };
        assert!(err.to_string().contains("users/a@x.com"));
        assert!(err.to_string().contains("missing field"));
    }
}
