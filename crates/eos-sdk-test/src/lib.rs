//! Test infrastructure for EOS SDK agents
//!
//! Provides:
//! - Fixtures for the example MAC keys and entries
//! - Event scripts that feed a controller event queue
//! - A test bed wiring in-memory managers to an event channel
//! - Status verification helpers

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
