//! Change notification for the entity tables.
//!
//! Each table has a [`Publisher`]. Subscribing hands back a [`Subscription`]
//! that immediately holds the current snapshot and then receives a full,
//! owned snapshot after every committed change to that table. Dropping a
//! subscription is all it takes to tear it down; the publisher forgets it on
//! its next publish and other subscribers never notice.

use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

pub struct Subscription<T> {
    rx: Receiver<Vec<T>>,
}

impl<T> Subscription<T> {
    /// Non-blocking poll for pending snapshots, oldest first (may be empty).
    pub fn poll(&self) -> Vec<Vec<T>> {
        let mut snapshots = Vec::new();
        while let Ok(snapshot) = self.rx.try_recv() {
            snapshots.push(snapshot);
        }
        snapshots
    }

    /// Drains pending snapshots and keeps only the newest.
    pub fn latest(&self) -> Option<Vec<T>> {
        self.poll().pop()
    }

    /// Blocks until the next snapshot. `None` once the store is gone.
    pub fn recv(&self) -> Option<Vec<T>> {
        self.rx.recv().ok()
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

pub(crate) struct Publisher<T> {
    senders: RefCell<Vec<Sender<Vec<T>>>>,
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self {
            senders: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Clone> Publisher<T> {
    pub(crate) fn subscribe(&self, current: Vec<T>) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        // Receiver is alive right here, so this cannot fail.
        let _ = tx.send(current);
        self.senders.borrow_mut().push(tx);
        Subscription { rx }
    }

    pub(crate) fn publish(&self, snapshot: &[T]) {
        self.senders
            .borrow_mut()
            .retain(|tx| tx.send(snapshot.to_vec()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.senders.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_delivers_current_snapshot() {
        let publisher: Publisher<u32> = Publisher::default();
        let sub = publisher.subscribe(vec![1, 2]);
        assert_eq!(sub.latest(), Some(vec![1, 2]));
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let publisher: Publisher<u32> = Publisher::default();
        let a = publisher.subscribe(vec![]);
        let b = publisher.subscribe(vec![]);
        publisher.publish(&[1]);
        publisher.publish(&[1, 2]);

        assert_eq!(a.poll(), vec![vec![], vec![1], vec![1, 2]]);
        assert_eq!(b.latest(), Some(vec![1, 2]));
    }

    #[test]
    fn dropped_subscription_is_pruned_without_affecting_others() {
        let publisher: Publisher<u32> = Publisher::default();
        let keep = publisher.subscribe(vec![]);
        let gone = publisher.subscribe(vec![]);
        drop(gone);
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(&[7]);
        assert_eq!(publisher.subscriber_count(), 1);
        assert_eq!(keep.latest(), Some(vec![7]));
    }

    #[test]
    fn recv_returns_none_after_publisher_is_dropped() {
        let publisher: Publisher<u32> = Publisher::default();
        let sub = publisher.subscribe(vec![3]);
        drop(publisher);
        assert_eq!(sub.recv(), Some(vec![3]));
        assert_eq!(sub.recv(), None);
        assert_eq!(sub.recv_timeout(Duration::from_millis(1)), None);
    }
}
