//! Bounded handoff queue between push-style producers and pull-style consumers.
//!
//! A queue of capacity one keeps the producer at most one item ahead of the
//! consumer. Nothing is dropped: a full queue makes `put` wait. The end of the
//! data is marked in-band with a sentinel, after which the receiver keeps
//! reporting `None` and further puts are rejected.

use std::task::{Context, Poll};

use tokio::sync::mpsc;

enum Slot<T> {
    Item(T),
    Sentinel,
}

/// The receiving half is gone, or it has already drawn the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("handoff queue receiver is closed")]
pub struct Disconnected;

pub struct HandoffSender<T> {
    tx: mpsc::Sender<Slot<T>>,
}

pub struct HandoffReceiver<T> {
    rx: mpsc::Receiver<Slot<T>>,
    drained: bool,
}

/// Creates a handoff queue holding at most `capacity` pending items.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn handoff<T>(capacity: usize) -> (HandoffSender<T>, HandoffReceiver<T>) {
    assert!(capacity > 0, "handoff queue capacity must be at least one");
    let (tx, rx) = mpsc::channel(capacity);
    (
        HandoffSender { tx },
        HandoffReceiver { rx, drained: false },
    )
}

impl<T> HandoffSender<T> {
    /// Waits for a free slot, then enqueues `item`.
    pub async fn put(&self, item: T) -> Result<(), Disconnected> {
        self.tx
            .send(Slot::Item(item))
            .await
            .map_err(|_| Disconnected)
    }

    /// Like [`put`](Self::put), for threads outside the async runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async execution context.
    pub fn blocking_put(&self, item: T) -> Result<(), Disconnected> {
        self.tx
            .blocking_send(Slot::Item(item))
            .map_err(|_| Disconnected)
    }

    /// Enqueues the sentinel. The receiver yields `None` once it reaches it.
    ///
    /// Cancel safe: if the future is dropped while waiting for a slot, no
    /// sentinel was enqueued and the call can be repeated.
    pub async fn finish(&self) -> Result<(), Disconnected> {
        let permit = self.tx.reserve().await.map_err(|_| Disconnected)?;
        permit.send(Slot::Sentinel);
        Ok(())
    }

    pub fn blocking_finish(&self) -> Result<(), Disconnected> {
        self.tx
            .blocking_send(Slot::Sentinel)
            .map_err(|_| Disconnected)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<T> HandoffReceiver<T> {
    /// Waits for the next item. `None` means the sentinel was drawn or every
    /// sender is gone; every later call returns `None` as well.
    pub async fn get(&mut self) -> Option<T> {
        std::future::poll_fn(|cx| self.poll_get(cx)).await
    }

    pub fn poll_get(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        if self.drained {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(Slot::Item(item))) => Poll::Ready(Some(item)),
            Poll::Ready(Some(Slot::Sentinel)) | Poll::Ready(None) => {
                self.drained = true;
                self.rx.close();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }
}
