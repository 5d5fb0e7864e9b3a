//! Threaded cursor bridge with a rendezvous handoff.
//!
//! A producer thread owns the cursor and hands items to the consumer over a
//! zero-capacity channel, so the producer never runs more than one item
//! ahead of the consumer. A [`CancellationToken`] is checked before every
//! poll and every handoff; [`CursorChannel::cancel`] (also run on drop)
//! cancels it, drops the receiving side so a producer parked in `send`
//! wakes up, and joins the producer thread.

use crate::cursor::{Cursor, CursorIter, Sentinel};
use crate::error::{SdkError, SdkResult};
use std::iter::FusedIterator;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

const PRODUCER_THREAD_NAME: &str = "cursor-producer";

/// Consumer side of a threaded cursor traversal.
pub struct CursorChannel<T> {
    rx: Option<Receiver<T>>,
    token: CancellationToken,
    producer: Option<JoinHandle<usize>>,
    produced: Option<usize>,
}

impl<T: Send + 'static> CursorChannel<T> {
    /// Starts a producer thread draining `cursor` until `is_end` matches.
    pub fn spawn<C, P>(cursor: C, is_end: P) -> SdkResult<Self>
    where
        C: Cursor<Item = T> + Send + 'static,
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(0);
        let token = CancellationToken::new();
        let stop = token.clone();

        let producer = thread::Builder::new()
            .name(PRODUCER_THREAD_NAME.to_string())
            .spawn(move || produce(CursorIter::new(cursor, is_end), tx, stop))
            .map_err(|source| SdkError::Spawn {
                name: PRODUCER_THREAD_NAME.to_string(),
                source,
            })?;

        Ok(Self {
            rx: Some(rx),
            token,
            producer: Some(producer),
            produced: None,
        })
    }

    /// Starts a producer thread draining `cursor` until the item type's
    /// own sentinel.
    pub fn spawn_items<C>(cursor: C) -> SdkResult<Self>
    where
        C: Cursor<Item = T> + Send + 'static,
        T: Sentinel,
    {
        Self::spawn(cursor, |item: &T| item.is_end())
    }
}

impl<T> CursorChannel<T> {
    /// Returns a handle that stops the producer when cancelled.
    ///
    /// Cancelling through the handle takes effect at the producer's next
    /// check; the consumer sees the end of the sequence on its next call.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stops the producer and waits for it to release the cursor.
    ///
    /// No item is delivered after this returns.
    pub fn cancel(&mut self) {
        if self.producer.is_some() {
            debug!("Cancelling cursor producer");
        }
        self.token.cancel();
        self.finish();
    }

    /// Returns true if the traversal was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of items the producer handed over, once it has been joined.
    pub fn produced(&self) -> Option<usize> {
        self.produced
    }

    fn finish(&mut self) {
        // Dropping the receiver unblocks a producer waiting in `send`
        self.rx.take();

        if let Some(handle) = self.producer.take() {
            match handle.join() {
                Ok(count) => self.produced = Some(count),
                Err(_) => error!("Cursor producer thread panicked"),
            }
        }
    }
}

impl<T> Iterator for CursorChannel<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.token.is_cancelled() {
            self.finish();
            return None;
        }

        let received = self.rx.as_ref()?.recv();
        match received {
            Ok(item) => Some(item),
            Err(_) => {
                // Producer reached the sentinel or was stopped
                self.finish();
                None
            }
        }
    }
}

impl<T> FusedIterator for CursorChannel<T> {}

impl<T> Drop for CursorChannel<T> {
    fn drop(&mut self) {
        if self.producer.is_some() {
            self.cancel();
        }
    }
}

fn produce<I: Iterator>(mut items: I, tx: SyncSender<I::Item>, stop: CancellationToken) -> usize {
    let mut handed = 0;
    loop {
        if stop.is_cancelled() {
            debug!(handed, "Cursor producer cancelled before poll");
            break;
        }
        let Some(item) = items.next() else {
            break;
        };
        if stop.is_cancelled() {
            debug!(handed, "Cursor producer cancelled before handoff");
            break;
        }
        if tx.send(item).is_err() {
            debug!(handed, "Cursor consumer went away");
            break;
        }
        handed += 1;
    }
    trace!(handed, "Cursor producer finished");
    handed
}
