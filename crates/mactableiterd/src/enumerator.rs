//! MAC table snapshot enumeration

use eos_sdk_common::{MacTableMgr, SdkResult};
use eos_types::{MacEntry, MacKey};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::bridge::bridge_cursor;
use crate::config::CursorBridgeMode;
use crate::status::StatusPublisher;

/// Walks the MAC table and publishes one status entry per key
pub struct SnapshotEnumerator {
    mac_table: Arc<dyn MacTableMgr>,
    status: StatusPublisher,
    mode: CursorBridgeMode,
}

impl SnapshotEnumerator {
    /// Creates an enumerator over `mac_table`
    pub fn new(
        mac_table: Arc<dyn MacTableMgr>,
        status: StatusPublisher,
        mode: CursorBridgeMode,
    ) -> Self {
        Self {
            mac_table,
            status,
            mode,
        }
    }

    /// Enumerates the table in cursor order.
    ///
    /// For every key the current entry is looked up and published under the
    /// key's canonical string. Keys whose entry vanished between the cursor
    /// and the lookup, or whose lookup was rejected, are logged and skipped;
    /// the rest of the traversal still runs. Only a fatal collaborator error
    /// ends it early. An empty table yields an empty list and no status
    /// writes.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn enumerate(&self) -> SdkResult<Vec<(MacKey, MacEntry)>> {
        let keys = bridge_cursor(self.mac_table.mac_table_status_iter()?, self.mode)?;
        let mut observed = Vec::new();

        for key in keys {
            let entry = match self.mac_table.mac_entry_status(&key) {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    warn!(%key, "MAC entry vanished during enumeration");
                    continue;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(%key, error = %e, "MAC entry lookup failed, skipping");
                    continue;
                }
            };
            self.status.entry(&entry)?;
            observed.push((key, entry));
        }

        debug!(count = observed.len(), "MAC table enumerated");
        Ok(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_sdk_common::{
        AgentMgr, BoxCursor, InMemoryAgentMgr, InMemoryMacTable, SdkError, SnapshotCursor,
    };
    use eos_types::IntfId;
    use pretty_assertions::assert_eq;

    fn entry(addr: &str) -> MacEntry {
        MacEntry::new(
            MacKey::parse("1", addr).unwrap(),
            IntfId::new("Ethernet1").unwrap(),
        )
    }

    fn setup(mode: CursorBridgeMode) -> (Arc<InMemoryAgentMgr>, Arc<InMemoryMacTable>, SnapshotEnumerator) {
        let mgr = Arc::new(InMemoryAgentMgr::new());
        let table = Arc::new(InMemoryMacTable::new());
        let enumerator =
            SnapshotEnumerator::new(table.clone(), StatusPublisher::new(mgr.clone()), mode);
        (mgr, table, enumerator)
    }

    #[test]
    fn test_enumerate_in_cursor_order() {
        for mode in [CursorBridgeMode::Inline, CursorBridgeMode::Threaded] {
            let (mgr, table, enumerator) = setup(mode);
            table.learn([entry("0000.1111.2222"), entry("0000.1111.2221")]);

            let observed = enumerator.enumerate().unwrap();
            let keys: Vec<MacKey> = observed.iter().map(|(k, _)| *k).collect();
            assert_eq!(
                keys,
                vec![*entry("0000.1111.2222").key(), *entry("0000.1111.2221").key()]
            );
            assert_eq!(mgr.status_writes().len(), 2);
        }
    }

    #[test]
    fn test_empty_table() {
        let (mgr, _table, enumerator) = setup(CursorBridgeMode::Inline);
        assert!(enumerator.enumerate().unwrap().is_empty());
        assert!(mgr.status_writes().is_empty());
    }

    /// Table whose cursor yields a fixed key list and whose lookup of one
    /// key is rejected.
    struct ScriptedTable {
        inner: InMemoryMacTable,
        cursor_keys: Vec<MacKey>,
        busy: Option<MacKey>,
    }

    impl ScriptedTable {
        fn new(entries: &[MacEntry], cursor_keys: Vec<MacKey>) -> Self {
            let inner = InMemoryMacTable::new();
            inner.learn(entries.iter().cloned());
            Self {
                inner,
                cursor_keys,
                busy: None,
            }
        }
    }

    impl MacTableMgr for ScriptedTable {
        fn mac_table_status_iter(&self) -> SdkResult<BoxCursor<MacKey>> {
            Ok(Box::new(SnapshotCursor::new(self.cursor_keys.clone())))
        }
        fn mac_entry_status(&self, key: &MacKey) -> SdkResult<Option<MacEntry>> {
            if self.busy.as_ref() == Some(key) {
                return Err(SdkError::rejected("mac_entry_status", "busy"));
            }
            self.inner.mac_entry_status(key)
        }
        fn mac_entry_set(&self, entry: MacEntry) -> SdkResult<()> {
            self.inner.mac_entry_set(entry)
        }
        fn mac_entry_del(&self, key: &MacKey) -> SdkResult<()> {
            self.inner.mac_entry_del(key)
        }
        fn watch_all_mac_entries(&self, watch: bool) -> SdkResult<()> {
            self.inner.watch_all_mac_entries(watch)
        }
    }

    fn scripted(table: ScriptedTable) -> (Arc<InMemoryAgentMgr>, SnapshotEnumerator) {
        let mgr = Arc::new(InMemoryAgentMgr::new());
        let enumerator = SnapshotEnumerator::new(
            Arc::new(table),
            StatusPublisher::new(mgr.clone()),
            CursorBridgeMode::Inline,
        );
        (mgr, enumerator)
    }

    #[test]
    fn test_vanished_entry_skipped() {
        let present = entry("0000.1111.2221");
        let gone = *entry("0000.1111.2222").key();
        let (mgr, enumerator) = scripted(ScriptedTable::new(
            &[present.clone()],
            vec![gone, *present.key()],
        ));

        let observed = enumerator.enumerate().unwrap();
        assert_eq!(observed, vec![(*present.key(), present.clone())]);
        assert!(mgr.status(&gone.to_string()).unwrap().is_none());
    }

    #[test]
    fn test_rejected_lookup_skips_only_that_key() {
        let entries = [
            entry("0000.1111.2221"),
            entry("0000.1111.2222"),
            entry("0000.1111.2223"),
        ];
        let keys: Vec<MacKey> = entries.iter().map(|e| *e.key()).collect();
        let mut table = ScriptedTable::new(&entries, keys.clone());
        table.busy = Some(keys[1]);
        let (mgr, enumerator) = scripted(table);

        let observed = enumerator.enumerate().unwrap();
        let observed_keys: Vec<MacKey> = observed.iter().map(|(k, _)| *k).collect();
        assert_eq!(observed_keys, vec![keys[0], keys[2]]);
        assert_eq!(mgr.status_writes().len(), 2);
        assert!(mgr.status(&keys[1].to_string()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_key_in_traversal() {
        let e = entry("0000.1111.2222");
        let (mgr, enumerator) = scripted(ScriptedTable::new(
            &[e.clone()],
            vec![*e.key(), *e.key()],
        ));

        let observed = enumerator.enumerate().unwrap();
        assert_eq!(observed.len(), 2);
        let status = mgr.status_snapshot();
        assert_eq!(status.len(), 1);
        assert_eq!(status[&e.key().to_string()], e.to_string());
    }

    #[test]
    fn test_disconnected_table_is_fatal() {
        let (_mgr, table, enumerator) = setup(CursorBridgeMode::Threaded);
        table.learn([entry("0000.1111.2222")]);
        table.disconnect();
        assert!(enumerator.enumerate().unwrap_err().is_fatal());
    }
}
