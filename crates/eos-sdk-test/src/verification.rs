//! Verification helpers for testing agents
//!
//! Provides assertion helpers over the status an agent published

use eos_sdk_common::InMemoryAgentMgr;
use eos_types::MacEntry;
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Expected status key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("Status key '{key}' unexpectedly present with value '{value}'")]
    UnexpectedKey { key: String, value: String },

    #[error("Value mismatch for status '{key}': expected '{expected}', got '{actual}'")]
    ValueMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Expected {expected} {what}, found {actual}")]
    CountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Status verification helper
pub struct StatusVerifier<'a> {
    mgr: &'a InMemoryAgentMgr,
}

impl<'a> StatusVerifier<'a> {
    /// Create a new status verifier
    pub fn new(mgr: &'a InMemoryAgentMgr) -> Self {
        Self { mgr }
    }

    /// Verify that a status key holds a specific value
    pub fn assert_status(&self, key: &str, expected: &str) -> VerifyResult<()> {
        match self.mgr.status_snapshot().get(key) {
            None => Err(VerificationError::KeyNotFound {
                key: key.to_string(),
            }),
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(VerificationError::ValueMismatch {
                key: key.to_string(),
                expected: expected.to_string(),
                actual: actual.clone(),
            }),
        }
    }

    /// Verify that a status key was never published
    pub fn assert_absent(&self, key: &str) -> VerifyResult<()> {
        match self.mgr.status_snapshot().get(key) {
            None => Ok(()),
            Some(value) => Err(VerificationError::UnexpectedKey {
                key: key.to_string(),
                value: value.clone(),
            }),
        }
    }

    /// Verify that every entry has a status line keyed by its key
    pub fn assert_mac_statuses<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e MacEntry>,
    ) -> VerifyResult<()> {
        for entry in entries {
            self.assert_status(&entry.key().to_string(), &entry.to_string())?;
        }
        Ok(())
    }

    /// Verify the number of distinct status keys
    pub fn assert_key_count(&self, expected: usize) -> VerifyResult<()> {
        Self::count("status keys", expected, self.mgr.status_snapshot().len())
    }

    /// Verify the number of status writes, counting overwrites
    pub fn assert_write_count(&self, expected: usize) -> VerifyResult<()> {
        Self::count("status writes", expected, self.mgr.status_writes().len())
    }

    /// Verify the number of shutdown acknowledgements
    pub fn assert_shutdown_acks(&self, expected: usize) -> VerifyResult<()> {
        Self::count("shutdown acks", expected, self.mgr.shutdown_acks())
    }

    fn count(what: &'static str, expected: usize, actual: usize) -> VerifyResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(VerificationError::CountMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::example_fixtures;
    use eos_sdk_common::AgentMgr;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assert_status() {
        let mgr = InMemoryAgentMgr::new();
        mgr.status_set("greeting", "Hello Alice!").unwrap();
        let verifier = StatusVerifier::new(&mgr);

        assert!(verifier.assert_status("greeting", "Hello Alice!").is_ok());
        assert_eq!(
            verifier.assert_status("greeting", "Adios!"),
            Err(VerificationError::ValueMismatch {
                key: "greeting".to_string(),
                expected: "Adios!".to_string(),
                actual: "Hello Alice!".to_string(),
            })
        );
        assert!(verifier.assert_absent("mac_set").is_ok());
        assert!(verifier.assert_absent("greeting").is_err());
    }

    #[test]
    fn test_assert_mac_statuses() {
        let mgr = InMemoryAgentMgr::new();
        let entry = example_fixtures::entry_one();
        mgr.status_set(&entry.key().to_string(), &entry.to_string())
            .unwrap();
        let verifier = StatusVerifier::new(&mgr);

        assert!(verifier.assert_mac_statuses([&entry]).is_ok());
        assert!(verifier
            .assert_mac_statuses(&example_fixtures::installed_entries())
            .is_err());
    }

    #[test]
    fn test_counts() {
        let mgr = InMemoryAgentMgr::new();
        mgr.status_set("a", "1").unwrap();
        mgr.status_set("a", "2").unwrap();
        let verifier = StatusVerifier::new(&mgr);

        assert!(verifier.assert_key_count(1).is_ok());
        assert!(verifier.assert_write_count(2).is_ok());
        assert!(verifier.assert_shutdown_acks(0).is_ok());
        assert!(verifier.assert_write_count(1).is_err());
    }
}
