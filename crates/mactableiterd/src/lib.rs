//! mactableiterd - MAC table iterator agent for EOS
//!
//! Greets whoever is named in the `name` option and drives the MAC address
//! table from options: `mac` enumerates it into status, `set` installs the
//! example bindings and `clear` removes every entry.

mod agent;
mod bridge;
mod commands;
mod config;
mod enumerator;
mod mutator;
mod status;
mod tables;
mod types;

pub use agent::MacTableAgent;
pub use bridge::*;
pub use commands::*;
pub use config::*;
pub use enumerator::SnapshotEnumerator;
pub use mutator::{ClearReport, SetReport, TableMutator};
pub use status::StatusPublisher;
pub use tables::*;
pub use types::*;
