//! Per-flag reactive state.
//!
//! Every flag name that has been observed or published gets a cell holding
//! its latest value. Observers share the cell: they see the value current at
//! subscription time, then each published value. A slow observer skips
//! straight to the newest value rather than draining a backlog.
//!
//! Cells outlive the definitions they mirror; clearing the store leaves them
//! in place.

use dashmap::DashMap;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Latest-value cells keyed by flag name.
#[derive(Debug, Default)]
pub struct SubscriptionHub {
    cells: DashMap<String, watch::Sender<bool>>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer to a flag.
    ///
    /// `initial` seeds the cell only when it does not exist yet; an existing
    /// cell keeps its value.
    pub fn observe(&self, name: &str, initial: bool) -> FlagSubscription {
        let receiver = self
            .cells
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe();

        FlagSubscription {
            name: name.to_string(),
            inner: WatchStream::new(receiver),
        }
    }

    /// Set a flag's value and wake every attached observer.
    ///
    /// Creates the cell if needed. The value is stored even with no
    /// observers attached.
    pub fn publish(&self, name: &str, enabled: bool) {
        if let Some(cell) = self.cells.get(name) {
            cell.send_replace(enabled);
            return;
        }

        self.cells
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(enabled).0)
            .send_replace(enabled);
    }

    /// Latest value of a cell, if it exists.
    pub fn current(&self, name: &str) -> Option<bool> {
        self.cells.get(name).map(|cell| *cell.borrow())
    }

    /// Number of live observers of a flag.
    pub fn observer_count(&self, name: &str) -> usize {
        self.cells
            .get(name)
            .map(|cell| cell.receiver_count())
            .unwrap_or(0)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Stream of a flag's values: the current one first, then every update.
///
/// The stream stays open for as long as the hub lives. Drop it to detach.
pub struct FlagSubscription {
    name: String,
    inner: WatchStream<bool>,
}

impl FlagSubscription {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FlagSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSubscription")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Stream for FlagSubscription {
    type Item = bool;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
