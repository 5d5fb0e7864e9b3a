//! Pull-style cursors and their iterator bridge.
//!
//! The management plane exposes large tables only through cursors: a
//! stateful object with a single "give me the next item" operation that
//! returns a sentinel value once the traversal is over. [`CursorIter`]
//! turns such a cursor into a regular [`Iterator`].

use eos_types::MacKey;
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// A single-pass, pull-based enumerator.
///
/// Each call to [`Cursor::next_item`] advances the traversal. Once the end
/// is reached the cursor keeps returning its sentinel value. A cursor cannot
/// be rewound; a new traversal needs a new cursor.
pub trait Cursor {
    /// The type of item produced.
    type Item;

    /// Returns the next item, or the sentinel once the traversal is over.
    fn next_item(&mut self) -> Self::Item;
}

/// A boxed cursor that can be moved to another thread.
pub type BoxCursor<T> = Box<dyn Cursor<Item = T> + Send>;

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn next_item(&mut self) -> Self::Item {
        (**self).next_item()
    }
}

/// Values that double as an end-of-sequence marker.
pub trait Sentinel {
    /// Returns true if this value marks the end of a traversal.
    fn is_end(&self) -> bool;
}

impl Sentinel for String {
    fn is_end(&self) -> bool {
        self.is_empty()
    }
}

impl Sentinel for MacKey {
    fn is_end(&self) -> bool {
        self.is_empty()
    }
}

/// Iterator over the items of a cursor, stopping at the sentinel.
///
/// The sentinel itself is never yielded and the cursor is not polled again
/// once it has been seen.
pub struct CursorIter<C, P> {
    cursor: C,
    is_end: P,
    done: bool,
}

impl<C, P> CursorIter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    /// Wraps `cursor`, using `is_end` to recognize the sentinel.
    pub fn new(cursor: C, is_end: P) -> Self {
        Self {
            cursor,
            is_end,
            done: false,
        }
    }

    /// Returns true once the sentinel has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.done
    }
}

impl<C, P> Iterator for CursorIter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.cursor.next_item();
        if (self.is_end)(&item) {
            self.done = true;
            return None;
        }
        Some(item)
    }
}

impl<C, P> FusedIterator for CursorIter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
}

/// Convenience adapters for cursors.
pub trait CursorExt: Cursor + Sized {
    /// Iterates until `is_end` matches.
    fn until<P>(self, is_end: P) -> CursorIter<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        CursorIter::new(self, is_end)
    }

    /// Iterates until the item type's own sentinel.
    fn items(self) -> CursorIter<Self, fn(&Self::Item) -> bool>
    where
        Self::Item: Sentinel,
    {
        let is_end: fn(&Self::Item) -> bool = <Self::Item as Sentinel>::is_end;
        CursorIter::new(self, is_end)
    }
}

impl<C: Cursor> CursorExt for C {}

/// Cursor over a snapshot taken when the cursor was created.
///
/// Returns `T::default()` as its sentinel once the snapshot is drained.
#[derive(Debug)]
pub struct SnapshotCursor<T> {
    items: VecDeque<T>,
}

impl<T> SnapshotCursor<T> {
    /// Creates a cursor over `items`, in order.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Number of items not yet returned.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<T: Default> Cursor for SnapshotCursor<T> {
    type Item = T;

    fn next_item(&mut self) -> T {
        self.items.pop_front().unwrap_or_default()
    }
}
