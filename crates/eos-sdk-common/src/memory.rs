//! In-process collaborator backends.
//!
//! These implement [`AgentMgr`] and [`MacTableMgr`] on plain maps so that an
//! agent can run without a device: the demo binary wires them to stdin and
//! the tests use them to inspect what the agent published.

use crate::cursor::{BoxCursor, SnapshotCursor};
use crate::error::{SdkError, SdkResult};
use crate::event::{AgentEvent, EventSender};
use crate::manager::{AgentMgr, MacTableMgr};
use eos_types::{MacEntry, MacKey, VlanId};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct AgentStore {
    options: BTreeMap<String, String>,
    status: BTreeMap<String, String>,
    status_writes: Vec<(String, String)>,
    shutdown_acks: usize,
}

/// Agent manager backed by in-memory option and status maps.
#[derive(Debug)]
pub struct InMemoryAgentMgr {
    store: Mutex<AgentStore>,
    shutdown: CancellationToken,
    connected: AtomicBool,
}

impl Default for InMemoryAgentMgr {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAgentMgr {
    /// Creates a manager with no options set.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(AgentStore::default()),
            shutdown: CancellationToken::new(),
            connected: AtomicBool::new(true),
        }
    }

    /// Creates a manager with the given options already configured.
    pub fn with_options<K, V>(options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mgr = Self::new();
        for (key, value) in options {
            mgr.set_option(key, value);
        }
        mgr
    }

    /// Sets an option the way the controlling plane would. An empty value
    /// removes the option.
    pub fn set_option(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        let mut store = lock(&self.store);
        if value.is_empty() {
            store.options.remove(&key);
        } else {
            store.options.insert(key, value);
        }
    }

    /// Returns a token cancelled when the agent acknowledges shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Number of shutdown acknowledgements received.
    pub fn shutdown_acks(&self) -> usize {
        lock(&self.store).shutdown_acks
    }

    /// Current status map.
    pub fn status_snapshot(&self) -> BTreeMap<String, String> {
        lock(&self.store).status.clone()
    }

    /// Every status write, in call order.
    pub fn status_writes(&self) -> Vec<(String, String)> {
        lock(&self.store).status_writes.clone()
    }

    /// Makes every subsequent call fail with a fatal disconnect.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn ensure_connected(&self, operation: &str) -> SdkResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SdkError::disconnected(operation))
        }
    }
}

impl AgentMgr for InMemoryAgentMgr {
    fn agent_option(&self, key: &str) -> SdkResult<Option<String>> {
        self.ensure_connected("agent_option")?;
        Ok(lock(&self.store).options.get(key).cloned())
    }

    fn agent_option_iter(&self) -> SdkResult<BoxCursor<String>> {
        self.ensure_connected("agent_option_iter")?;
        let values: Vec<String> = lock(&self.store).options.values().cloned().collect();
        Ok(Box::new(SnapshotCursor::new(values)))
    }

    fn status(&self, key: &str) -> SdkResult<Option<String>> {
        self.ensure_connected("status")?;
        Ok(lock(&self.store).status.get(key).cloned())
    }

    fn status_set(&self, key: &str, value: &str) -> SdkResult<()> {
        self.ensure_connected("status_set")?;
        trace!(key, value, "status_set");
        let mut store = lock(&self.store);
        store
            .status_writes
            .push((key.to_string(), value.to_string()));
        store.status.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn agent_shutdown_complete_is(&self, complete: bool) -> SdkResult<()> {
        self.ensure_connected("agent_shutdown_complete_is")?;
        if complete {
            lock(&self.store).shutdown_acks += 1;
            self.shutdown.cancel();
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TableStore {
    entries: Vec<MacEntry>,
    watching: bool,
    failing_deletes: HashSet<MacKey>,
}

impl TableStore {
    fn position(&self, key: &MacKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key() == key)
    }
}

/// MAC table backed by an insertion-ordered entry list.
///
/// Cursors iterate over a snapshot of the keys taken when the cursor is
/// created, in insertion order. Overwriting an entry keeps its position.
#[derive(Debug)]
pub struct InMemoryMacTable {
    store: Mutex<TableStore>,
    notifier: Option<EventSender>,
    connected: AtomicBool,
}

impl Default for InMemoryMacTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMacTable {
    /// Creates an empty table without change notifications.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(TableStore::default()),
            notifier: None,
            connected: AtomicBool::new(true),
        }
    }

    /// Creates an empty table that pushes change events into `notifier`
    /// while a watch is registered.
    pub fn with_notifier(notifier: EventSender) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::new()
        }
    }

    /// Adds entries as if the device had learned them.
    pub fn learn(&self, entries: impl IntoIterator<Item = MacEntry>) {
        for entry in entries {
            let event = self.upsert(entry);
            self.notify(event);
        }
    }

    /// Snapshot of every entry, in table order.
    pub fn entries(&self) -> Vec<MacEntry> {
        lock(&self.store).entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        lock(&self.store).entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        lock(&self.store).entries.is_empty()
    }

    /// Returns true while a watch-all subscription is registered.
    pub fn is_watching(&self) -> bool {
        lock(&self.store).watching
    }

    /// Makes deletes of `key` fail with a non-fatal rejection.
    pub fn fail_delete_for(&self, key: MacKey) {
        lock(&self.store).failing_deletes.insert(key);
    }

    /// Makes every subsequent call fail with a fatal disconnect.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn ensure_connected(&self, operation: &str) -> SdkResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SdkError::disconnected(operation))
        }
    }

    /// Inserts or overwrites, returning the notification to raise, if any.
    fn upsert(&self, entry: MacEntry) -> Option<AgentEvent> {
        let mut store = lock(&self.store);
        match store.position(entry.key()) {
            Some(pos) if store.entries[pos] == entry => None,
            Some(pos) => {
                store.entries[pos] = entry.clone();
                store.watching.then(|| AgentEvent::MacEntrySet(entry))
            }
            None => {
                store.entries.push(entry.clone());
                store.watching.then(|| AgentEvent::MacEntrySet(entry))
            }
        }
    }

    fn notify(&self, event: Option<AgentEvent>) {
        let (Some(event), Some(notifier)) = (event, self.notifier.as_ref()) else {
            return;
        };
        if notifier.send(event).is_err() {
            debug!("Event queue closed, dropping MAC table notification");
        }
    }
}

impl MacTableMgr for InMemoryMacTable {
    fn mac_table_status_iter(&self) -> SdkResult<BoxCursor<MacKey>> {
        self.ensure_connected("mac_table_status_iter")?;
        let keys: Vec<MacKey> = lock(&self.store).entries.iter().map(|e| *e.key()).collect();
        Ok(Box::new(SnapshotCursor::new(keys)))
    }

    fn mac_entry_status(&self, key: &MacKey) -> SdkResult<Option<MacEntry>> {
        self.ensure_connected("mac_entry_status")?;
        let store = lock(&self.store);
        Ok(store.position(key).map(|pos| store.entries[pos].clone()))
    }

    fn mac_entry_set(&self, entry: MacEntry) -> SdkResult<()> {
        self.ensure_connected("mac_entry_set")?;
        let key = *entry.key();
        if VlanId::new(key.vlan_id()).is_err() {
            return Err(SdkError::invalid_entry(key, "0 and 4095 are reserved VLAN IDs"));
        }
        let event = self.upsert(entry);
        self.notify(event);
        Ok(())
    }

    fn mac_entry_del(&self, key: &MacKey) -> SdkResult<()> {
        self.ensure_connected("mac_entry_del")?;
        let event = {
            let mut store = lock(&self.store);
            if store.failing_deletes.contains(key) {
                return Err(SdkError::rejected(
                    "mac_entry_del",
                    format!("{} is locked", key),
                ));
            }
            match store.position(key) {
                Some(pos) => {
                    store.entries.remove(pos);
                    store.watching.then_some(AgentEvent::MacEntryDel(*key))
                }
                None => None,
            }
        };
        self.notify(event);
        Ok(())
    }

    fn watch_all_mac_entries(&self, watch: bool) -> SdkResult<()> {
        self.ensure_connected("watch_all_mac_entries")?;
        lock(&self.store).watching = watch;
        Ok(())
    }
}
