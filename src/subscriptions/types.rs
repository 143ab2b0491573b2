//! Subscription types for live store updates.

use super::manager::RouterInner;
use crate::types::{StoreEvent, Topic};
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Default per-subscriber queue capacity.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Configuration for subscriber queues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionConfig {
    /// Max buffered events per subscriber before it is dropped.
    /// `None` means unbounded queues. Zero is treated as one.
    /// Default: 1024
    pub buffer_size: Option<usize>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: Some(DEFAULT_BUFFER_SIZE),
        }
    }
}

impl SubscriptionConfig {
    /// Queues holding at most `buffer_size` events (at least one).
    pub fn bounded(buffer_size: usize) -> Self {
        Self {
            buffer_size: Some(buffer_size.max(1)),
        }
    }

    /// Queues that never fill up, so no subscriber is ever dropped.
    pub fn unbounded() -> Self {
        Self { buffer_size: None }
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live subscription to one topic.
///
/// Iterating blocks until the next event arrives and ends once the
/// subscription is cancelled, dropped by the router, or the router is gone.
/// Dropping the handle cancels the subscription.
pub struct SubscriptionHandle {
    id: SubscriptionId,
    topic: Topic,
    receiver: Receiver<StoreEvent>,
    cancelled: Arc<AtomicBool>,
    router: Weak<RouterInner>,
}

impl SubscriptionHandle {
    pub(super) fn new(
        id: SubscriptionId,
        topic: Topic,
        receiver: Receiver<StoreEvent>,
        cancelled: Arc<AtomicBool>,
        router: Weak<RouterInner>,
    ) -> Self {
        Self {
            id,
            topic,
            receiver,
            cancelled,
            router,
        }
    }

    /// True once unsubscribed. Anything still queued is thrown away.
    fn discarded(&self) -> bool {
        if !self.cancelled.load(Ordering::Acquire) {
            return false;
        }
        while self.receiver.try_recv().is_ok() {}
        true
    }

    /// Router-assigned id, usable with `TopicRouter::unsubscribe`.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this subscription is bound to.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, RecvError> {
        if self.discarded() {
            return Err(RecvError);
        }
        let event = self.receiver.recv()?;
        if self.discarded() {
            return Err(RecvError);
        }
        Ok(event)
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, TryRecvError> {
        if self.discarded() {
            return Err(TryRecvError::Disconnected);
        }
        let event = self.receiver.try_recv()?;
        if self.discarded() {
            return Err(TryRecvError::Disconnected);
        }
        Ok(event)
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<StoreEvent, RecvTimeoutError> {
        if self.discarded() {
            return Err(RecvTimeoutError::Disconnected);
        }
        let event = self.receiver.recv_timeout(timeout)?;
        if self.discarded() {
            return Err(RecvTimeoutError::Disconnected);
        }
        Ok(event)
    }

    /// Take every event currently buffered without blocking.
    pub fn drain(&self) -> Vec<StoreEvent> {
        if self.discarded() {
            return Vec::new();
        }
        self.receiver.try_iter().collect()
    }

    /// Deregister from the router and discard undelivered events.
    ///
    /// Idempotent. Returns true if this call removed the subscription.
    pub fn cancel(&self) -> bool {
        let removed = match self.router.upgrade() {
            Some(router) => router.remove(&self.topic, self.id),
            None => false,
        };
        self.cancelled.store(true, Ordering::Release);
        while self.receiver.try_recv().is_ok() {}
        removed
    }
}

impl Iterator for SubscriptionHandle {
    type Item = StoreEvent;

    fn next(&mut self) -> Option<StoreEvent> {
        self.recv().ok()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
