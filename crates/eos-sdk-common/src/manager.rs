//! Interfaces of the management-plane collaborators.
//!
//! An agent talks to the device through two managers: the agent manager
//! (options in, status out, lifecycle acknowledgements) and the MAC table
//! manager. Both are owned by the management plane and shared with the
//! agent behind `Arc<dyn ...>`.

use crate::cursor::BoxCursor;
use crate::error::SdkResult;
use eos_types::{MacEntry, MacKey};

/// Agent configuration and status surface.
///
/// Options are written by the controlling plane and only read here. Status
/// entries are written by the agent and read by the controlling plane; a
/// write overwrites any previous value for the key and is visible as soon
/// as the call returns.
pub trait AgentMgr: Send + Sync {
    /// Returns the value of an option, or `None` if it is not configured.
    fn agent_option(&self, key: &str) -> SdkResult<Option<String>>;

    /// Returns a cursor over all option values. The empty string ends it.
    fn agent_option_iter(&self) -> SdkResult<BoxCursor<String>>;

    /// Returns the last published value of a status key.
    fn status(&self, key: &str) -> SdkResult<Option<String>>;

    /// Publishes a status value, overwriting the previous one.
    fn status_set(&self, key: &str, value: &str) -> SdkResult<()>;

    /// Tells the controller the agent has finished shutting down.
    fn agent_shutdown_complete_is(&self, complete: bool) -> SdkResult<()>;
}

/// MAC address table surface.
pub trait MacTableMgr: Send + Sync {
    /// Returns a cursor over the keys of every entry in the table. The
    /// empty key ends it.
    fn mac_table_status_iter(&self) -> SdkResult<BoxCursor<MacKey>>;

    /// Returns the current entry for `key`, or `None` if it is gone.
    fn mac_entry_status(&self, key: &MacKey) -> SdkResult<Option<MacEntry>>;

    /// Installs or overwrites an entry.
    fn mac_entry_set(&self, entry: MacEntry) -> SdkResult<()>;

    /// Removes an entry.
    fn mac_entry_del(&self, key: &MacKey) -> SdkResult<()>;

    /// Subscribes to (or unsubscribes from) change notifications for every
    /// entry of the table.
    fn watch_all_mac_entries(&self, watch: bool) -> SdkResult<()>;
}
