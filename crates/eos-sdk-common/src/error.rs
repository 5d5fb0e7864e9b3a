//! Error types for management-plane operations.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use eos_types::{MacKey, ParseError};
use std::io;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors reported by the management-plane collaborators.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The collaborator is gone. Fatal: the agent must exit and let its
    /// supervisor restart it.
    #[error("Management plane disconnected: {operation}")]
    Disconnected {
        /// The operation that observed the disconnect.
        operation: String,
    },

    /// The table rejected an entry (bad VLAN, bad interface, ...).
    #[error("Invalid MAC entry {key}: {reason}")]
    InvalidEntry {
        /// The key of the rejected entry.
        key: MacKey,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The entry does not exist.
    #[error("MAC entry not found: {key}")]
    EntryNotFound {
        /// The missing key.
        key: MacKey,
    },

    /// The collaborator refused the operation.
    #[error("Operation rejected: {operation}: {message}")]
    Rejected {
        /// The operation that was refused.
        operation: String,
        /// Error message.
        message: String,
    },

    /// A value could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A worker thread could not be started.
    #[error("Failed to spawn {name}: {source}")]
    Spawn {
        /// Name of the thread.
        name: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SdkError {
    /// Creates a disconnect error.
    pub fn disconnected(operation: impl Into<String>) -> Self {
        Self::Disconnected {
            operation: operation.into(),
        }
    }

    /// Creates an invalid entry error.
    pub fn invalid_entry(key: MacKey, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            key,
            reason: reason.into(),
        }
    }

    /// Creates an entry not found error.
    pub fn entry_not_found(key: MacKey) -> Self {
        Self::EntryNotFound { key }
    }

    /// Creates a rejected operation error.
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the agent cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SdkError::Disconnected { .. })
    }
}
