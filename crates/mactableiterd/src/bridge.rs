//! Cursor bridge selection

use crate::config::CursorBridgeMode;
use eos_sdk_common::{BoxCursor, CursorChannel, CursorExt, SdkResult, Sentinel};

/// Iterator over the items of a management-plane cursor
pub type CursorItems<T> = Box<dyn Iterator<Item = T>>;

/// Turns `cursor` into an iterator using the configured rendition.
///
/// With [`CursorBridgeMode::Threaded`] the producer is stopped and joined
/// when the returned iterator is dropped, even if it was not drained.
pub fn bridge_cursor<T>(cursor: BoxCursor<T>, mode: CursorBridgeMode) -> SdkResult<CursorItems<T>>
where
    T: Sentinel + Send + 'static,
{
    Ok(match mode {
        CursorBridgeMode::Inline => Box::new(cursor.items()),
        CursorBridgeMode::Threaded => Box::new(CursorChannel::spawn_items(cursor)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_sdk_common::SnapshotCursor;
    use pretty_assertions::assert_eq;

    fn cursor(values: &[&str]) -> BoxCursor<String> {
        Box::new(SnapshotCursor::new(values.iter().map(|v| v.to_string())))
    }

    #[test]
    fn test_both_modes_agree() {
        for mode in [CursorBridgeMode::Inline, CursorBridgeMode::Threaded] {
            let items: Vec<String> = bridge_cursor(cursor(&["a", "b", "c"]), mode)
                .unwrap()
                .collect();
            assert_eq!(items, vec!["a", "b", "c"], "mode {}", mode);
        }
    }

    #[test]
    fn test_threaded_abandon() {
        let mut items = bridge_cursor(cursor(&["a", "b", "c"]), CursorBridgeMode::Threaded).unwrap();
        assert_eq!(items.next().as_deref(), Some("a"));
        drop(items);
    }
}
