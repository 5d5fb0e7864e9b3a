//! MAC table mutation
//!
//! Batch operations keep going past per-key failures and collect them in a
//! report. Only a fatal collaborator error aborts a batch.
//!
//! `clear_all` deliberately continues past a rejected delete and reports it
//! instead of stopping at the first failure.

use eos_sdk_common::{MacTableMgr, SdkError, SdkResult};
use eos_types::{IntfId, MacEntry, MacKey, ParseError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::bridge::bridge_cursor;
use crate::config::CursorBridgeMode;
use crate::tables::EXAMPLE_BINDINGS;

/// Outcome of installing a batch of entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetReport {
    /// Set calls issued
    pub attempted: usize,
    /// Keys whose set was rejected, with the reason
    pub failed: Vec<(MacKey, String)>,
}

impl SetReport {
    /// Number of set calls that succeeded
    pub fn installed(&self) -> usize {
        self.attempted - self.failed.len()
    }

    /// One-line summary for the status surface
    pub fn summary(&self) -> String {
        summarize("installed", self.installed(), self.attempted, self.failed.len())
    }
}

/// Outcome of clearing the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Keys observed by the enumeration
    pub observed: usize,
    /// Keys whose delete was rejected, with the reason
    pub failed: Vec<(MacKey, String)>,
}

impl ClearReport {
    /// Number of entries deleted
    pub fn cleared(&self) -> usize {
        self.observed - self.failed.len()
    }

    /// One-line summary for the status surface
    pub fn summary(&self) -> String {
        summarize("cleared", self.cleared(), self.observed, self.failed.len())
    }
}

fn summarize(verb: &str, done: usize, total: usize, failed: usize) -> String {
    if failed == 0 {
        format!("{} {} of {} entries", verb, done, total)
    } else {
        format!("{} {} of {} entries ({} failed)", verb, done, total, failed)
    }
}

/// Installs and removes MAC table entries
pub struct TableMutator {
    mac_table: Arc<dyn MacTableMgr>,
    mode: CursorBridgeMode,
}

impl TableMutator {
    /// Creates a mutator over `mac_table`
    pub fn new(mac_table: Arc<dyn MacTableMgr>, mode: CursorBridgeMode) -> Self {
        Self { mac_table, mode }
    }

    /// Binds `key` to `intf`, overwriting any existing binding.
    ///
    /// Installing the same binding twice leaves the table unchanged.
    pub fn set_entry(&self, key: MacKey, intf: IntfId) -> SdkResult<()> {
        debug!(%key, %intf, "Setting MAC entry");
        self.mac_table.mac_entry_set(MacEntry::new(key, intf))
    }

    /// Installs every entry, collecting non-fatal failures
    #[instrument(skip_all)]
    pub fn set_entries(
        &self,
        entries: impl IntoIterator<Item = (MacKey, IntfId)>,
    ) -> SdkResult<SetReport> {
        let mut report = SetReport::default();
        for (key, intf) in entries {
            report.attempted += 1;
            if let Err(e) = self.set_entry(key, intf) {
                record_failure(&mut report.failed, key, e)?;
            }
        }
        info!(summary = %report.summary(), "MAC entries set");
        Ok(report)
    }

    /// Installs the example bindings.
    pub fn set_example_entries(&self) -> SdkResult<SetReport> {
        let bindings = example_bindings()?;
        self.set_entries(bindings)
    }

    /// Deletes every entry observed by a fresh enumeration of the table.
    ///
    /// A rejected delete is logged and reported and the remaining keys are
    /// still processed.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn clear_all(&self) -> SdkResult<ClearReport> {
        let keys = bridge_cursor(self.mac_table.mac_table_status_iter()?, self.mode)?;
        let mut report = ClearReport::default();

        for key in keys {
            report.observed += 1;
            if let Err(e) = self.mac_table.mac_entry_del(&key) {
                record_failure(&mut report.failed, key, e)?;
            }
        }

        info!(summary = %report.summary(), "MAC table cleared");
        Ok(report)
    }
}

/// Records a non-fatal failure, or returns the error if it is fatal.
fn record_failure(failed: &mut Vec<(MacKey, String)>, key: MacKey, e: SdkError) -> SdkResult<()> {
    if e.is_fatal() {
        return Err(e);
    }
    warn!(%key, error = %e, "MAC table operation failed");
    failed.push((key, e.to_string()));
    Ok(())
}

fn example_bindings() -> Result<Vec<(MacKey, IntfId)>, ParseError> {
    EXAMPLE_BINDINGS
        .iter()
        .map(|(vlan, addr, intf)| {
            let key = MacKey::parse(&vlan.to_string(), addr)?;
            Ok((key, IntfId::new(*intf)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_sdk_common::InMemoryMacTable;
    use pretty_assertions::assert_eq;

    fn key(addr: &str) -> MacKey {
        MacKey::parse("1", addr).unwrap()
    }

    fn intf(name: &str) -> IntfId {
        IntfId::new(name).unwrap()
    }

    fn setup() -> (Arc<InMemoryMacTable>, TableMutator) {
        let table = Arc::new(InMemoryMacTable::new());
        let mutator = TableMutator::new(table.clone(), CursorBridgeMode::Inline);
        (table, mutator)
    }

    #[test]
    fn test_set_entry_idempotent() {
        let (table, mutator) = setup();
        mutator.set_entry(key("0000.1111.2222"), intf("Ethernet1")).unwrap();
        let once = table.entries();
        mutator.set_entry(key("0000.1111.2222"), intf("Ethernet1")).unwrap();
        assert_eq!(table.entries(), once);
    }

    #[test]
    fn test_example_entries() {
        let (table, mutator) = setup();
        let report = mutator.set_example_entries().unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.summary(), "installed 3 of 3 entries");
        assert_eq!(
            table.entries(),
            vec![
                MacEntry::new(key("0000.1111.2222"), intf("Ethernet1")),
                MacEntry::new(key("0000.1111.2221"), intf("Ethernet1")),
            ]
        );
    }

    #[test]
    fn test_set_entries_collects_rejections() {
        let (table, mutator) = setup();
        let reserved = MacKey::from_raw(4095, "0000.1111.2222".parse().unwrap());

        let report = mutator
            .set_entries([
                (reserved, intf("Ethernet1")),
                (key("0000.1111.2221"), intf("Ethernet2")),
            ])
            .unwrap();

        assert_eq!(report.installed(), 1);
        assert_eq!(report.failed[0].0, reserved);
        assert_eq!(report.summary(), "installed 1 of 2 entries (1 failed)");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        for mode in [CursorBridgeMode::Inline, CursorBridgeMode::Threaded] {
            let table = Arc::new(InMemoryMacTable::new());
            let mutator = TableMutator::new(table.clone(), mode);
            mutator.set_example_entries().unwrap();

            let report = mutator.clear_all().unwrap();
            assert_eq!(report.observed, 2);
            assert_eq!(report.summary(), "cleared 2 of 2 entries");
            assert!(table.is_empty());
        }
    }

    #[test]
    fn test_clear_all_continues_past_failure() {
        let (table, mutator) = setup();
        mutator.set_example_entries().unwrap();
        table.fail_delete_for(key("0000.1111.2222"));

        let report = mutator.clear_all().unwrap();
        assert_eq!(report.cleared(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.summary(), "cleared 1 of 2 entries (1 failed)");
        assert_eq!(
            table.entries(),
            vec![MacEntry::new(key("0000.1111.2222"), intf("Ethernet1"))]
        );
    }

    #[test]
    fn test_clear_empty_table() {
        let (_table, mutator) = setup();
        assert_eq!(mutator.clear_all().unwrap(), ClearReport::default());
    }

    #[test]
    fn test_disconnect_aborts_batch() {
        let (table, mutator) = setup();
        table.disconnect();
        assert!(mutator.set_example_entries().unwrap_err().is_fatal());
    }
}
