//! Public error type
//!
//! Only collaborator failures and malformed calls are errors. Extraction misses
//! are empty results, and corrections that target nothing come back as
//! `success: false` outcomes.

use crate::storage::StoreError;

/// Message shown to callers when a collaborator is down
pub const MEMORY_UNAVAILABLE: &str = "memory temporarily unavailable";

/// Error returned by the memory core
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// A fact store or vector store call failed; the original cause is attached
    #[error("memory store failure: {0}")]
    Store(#[from] StoreError),
    /// The caller passed arguments that cannot be acted on
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MemoryError {
    /// Text safe to surface to an end user
    pub fn user_message(&self) -> String {
        match self {
            MemoryError::Store(_) => MEMORY_UNAVAILABLE.to_string(),
            MemoryError::InvalidArgument(msg) => msg.clone(),
        }
    }

    /// Whether this is a collaborator outage (the caller may proceed without memory)
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MemoryError::Store(_))
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, MemoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_store_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = MemoryError::from(StoreError::unavailable("qdrant", io));

        assert!(err.is_unavailable());
        assert_eq!(err.user_message(), MEMORY_UNAVAILABLE);
        let store_err = err.source().expect("store error attached");
        assert!(store_err.source().is_some(), "client error attached");
    }

    #[test]
    fn test_invalid_argument_message_passes_through() {
        let err = MemoryError::InvalidArgument("subject is required".into());
        assert!(!err.is_unavailable());
        assert_eq!(err.user_message(), "subject is required");
    }
}
