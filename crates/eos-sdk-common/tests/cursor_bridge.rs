//! Cursor bridge properties over the in-memory MAC table.

use eos_sdk_common::{
    Cursor, CursorChannel, CursorExt, InMemoryMacTable, MacTableMgr, SnapshotCursor,
};
use eos_types::{EthAddr, IntfId, MacEntry, MacKey, VlanId};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn table_with(n: u8) -> InMemoryMacTable {
    let table = InMemoryMacTable::new();
    let vlan = VlanId::new(1).unwrap();
    table.learn((1..=n).map(|i| {
        MacEntry::new(
            MacKey::new(vlan, EthAddr::new([0, 0, 0x11, 0x11, 0x22, i])),
            IntfId::new("Ethernet1").unwrap(),
        )
    }));
    table
}

/// Drains a cursor by hand, the way a caller without the bridge would.
fn drain_directly(mut cursor: impl Cursor<Item = MacKey>) -> Vec<MacKey> {
    let mut keys = Vec::new();
    loop {
        let key = cursor.next_item();
        if key.is_empty() {
            return keys;
        }
        keys.push(key);
    }
}

#[test]
fn bridges_match_direct_drain() {
    let table = table_with(20);
    let direct = drain_directly(table.mac_table_status_iter().unwrap());

    let inline: Vec<MacKey> = table.mac_table_status_iter().unwrap().items().collect();
    let threaded: Vec<MacKey> = CursorChannel::spawn_items(table.mac_table_status_iter().unwrap())
        .unwrap()
        .collect();

    assert_eq!(direct.len(), 20);
    assert_eq!(inline, direct);
    assert_eq!(threaded, direct);
}

#[test]
fn empty_table_yields_nothing() {
    let table = InMemoryMacTable::new();
    assert_eq!(table.mac_table_status_iter().unwrap().items().count(), 0);
    assert_eq!(
        CursorChannel::spawn_items(table.mac_table_status_iter().unwrap())
            .unwrap()
            .count(),
        0
    );
}

/// Cursor that never ends and counts its polls.
struct Unbounded(Arc<AtomicUsize>);

impl Cursor for Unbounded {
    type Item = String;

    fn next_item(&mut self) -> String {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        format!("value-{}", n)
    }
}

#[test]
fn early_abandon_releases_producer() {
    let polls = Arc::new(AtomicUsize::new(0));
    let mut channel = CursorChannel::spawn_items(Unbounded(Arc::clone(&polls))).unwrap();

    assert_eq!(channel.next().as_deref(), Some("value-0"));

    let started = Instant::now();
    channel.cancel();
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(channel.produced(), Some(1));
    assert_eq!(channel.next(), None);

    let settled = polls.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(polls.load(Ordering::SeqCst), settled);
}

#[test]
fn snapshot_cursor_ignores_later_writes() {
    let table = table_with(2);
    let cursor = table.mac_table_status_iter().unwrap();
    table.learn([MacEntry::new(
        MacKey::parse("2", "0000.1111.3333").unwrap(),
        IntfId::new("Ethernet2").unwrap(),
    )]);

    assert_eq!(cursor.items().count(), 2);
    assert_eq!(SnapshotCursor::new(table.entries()).remaining(), 3);
}
