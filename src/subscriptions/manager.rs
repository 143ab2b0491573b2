//! Topic router for broadcasting store events.

use crate::types::{StoreEvent, Topic};
use crossbeam_channel::{bounded, unbounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::types::{SubscriptionConfig, SubscriptionHandle, SubscriptionId};

/// Internal subscriber state.
struct Subscriber {
    id: SubscriptionId,
    sender: Sender<StoreEvent>,
    /// Shared with the handle. Set on unsubscribe so the handle discards
    /// whatever is still queued.
    cancelled: Arc<AtomicBool>,
}

impl Subscriber {
    /// Try to send an event. Returns false if the subscriber must be dropped.
    fn try_send(&self, topic: &Topic, event: StoreEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(subscription = %self.id, topic = %topic, "subscriber buffer full, dropping subscription");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(subscription = %self.id, topic = %topic, "subscriber disconnected");
                false
            }
        }
    }
}

pub(crate) struct RouterInner {
    /// Subscribers by topic. The lock also linearizes publishes, so every
    /// subscriber of a topic sees events in the same order.
    topics: Mutex<HashMap<Topic, Vec<Subscriber>>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    config: SubscriptionConfig,
}

impl RouterInner {
    /// Remove one subscriber and mark what it has not yet received as discarded.
    pub(crate) fn remove(&self, topic: &Topic, id: SubscriptionId) -> bool {
        let mut topics = self.topics.lock();
        let Some(subs) = topics.get_mut(topic) else {
            return false;
        };

        let removed = match subs.iter().position(|sub| sub.id == id) {
            Some(index) => {
                let sub = subs.remove(index);
                sub.cancelled.store(true, Ordering::Release);
                true
            }
            None => false,
        };

        if subs.is_empty() {
            topics.remove(topic);
        }

        if removed {
            debug!(subscription = %id, topic = %topic, "unsubscribed");
        }
        removed
    }
}

/// Maps topics to subscriber queues and fans events out to them.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct TopicRouter {
    inner: Arc<RouterInner>,
}

impl TopicRouter {
    /// Create a router with the default queue configuration.
    pub fn new() -> Self {
        Self::with_config(SubscriptionConfig::default())
    }

    /// Create a router whose subscriber queues follow `config`.
    pub fn with_config(config: SubscriptionConfig) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                topics: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Bind a new queue to `topic`.
    ///
    /// The handle only observes events published after this call. Subscribing
    /// to a topic nobody publishes on is fine; the handle simply waits.
    pub fn subscribe(&self, topic: Topic) -> SubscriptionHandle {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        // A zero-capacity channel would reject every try_send.
        let (sender, receiver) = match self.inner.config.buffer_size {
            Some(size) => bounded(size.max(1)),
            None => unbounded(),
        };
        let cancelled = Arc::new(AtomicBool::new(false));

        self.inner
            .topics
            .lock()
            .entry(topic.clone())
            .or_default()
            .push(Subscriber {
                id,
                sender,
                cancelled: cancelled.clone(),
            });

        debug!(subscription = %id, topic = %topic, "subscribed");
        SubscriptionHandle::new(id, topic, receiver, cancelled, Arc::downgrade(&self.inner))
    }

    /// Unsubscribe and discard pending events. Idempotent.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let topic = self
            .inner
            .topics
            .lock()
            .iter()
            .find(|(_, subs)| subs.iter().any(|sub| sub.id == id))
            .map(|(topic, _)| topic.clone());

        match topic {
            Some(topic) => self.inner.remove(&topic, id),
            None => false,
        }
    }

    /// Deliver `event` to every queue bound to `topic`.
    ///
    /// Never blocks. Returns how many subscribers accepted the event; with no
    /// subscribers the event is dropped. Subscribers whose queue is full or
    /// whose receiver is gone are removed.
    pub fn publish(&self, topic: &Topic, event: StoreEvent) -> usize {
        let mut topics = self.inner.topics.lock();
        let Some(subs) = topics.get_mut(topic) else {
            trace!(topic = %topic, "no subscribers, event dropped");
            return 0;
        };

        let mut delivered = 0;
        subs.retain(|sub| {
            let accepted = sub.try_send(topic, event.clone());
            if accepted {
                delivered += 1;
            }
            accepted
        });

        if subs.is_empty() {
            topics.remove(topic);
        }

        trace!(topic = %topic, delivered, "published");
        delivered
    }

    /// Get subscription count across all topics.
    pub fn subscription_count(&self) -> usize {
        self.inner.topics.lock().values().map(Vec::len).sum()
    }

    /// Number of queues currently bound to `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.inner
            .topics
            .lock()
            .get(topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for TopicRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MutationKind, Post, PostId, UserId};
    use crossbeam_channel::TryRecvError;
    use std::thread;
    use std::time::Duration;

    fn make_test_event(id: &str) -> StoreEvent {
        StoreEvent::post(
            MutationKind::Created,
            Post {
                id: PostId::from(id),
                title: format!("title {}", id),
                body: String::new(),
                published: true,
                author: UserId::from("1"),
            },
        )
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let router = TopicRouter::new();

        let handle = router.subscribe(Topic::posts());
        assert_eq!(router.subscription_count(), 1);

        assert!(router.unsubscribe(handle.id()));
        assert_eq!(router.subscription_count(), 0);

        // Idempotent
        assert!(!router.unsubscribe(handle.id()));
        assert!(!handle.cancel());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let router = TopicRouter::new();
        assert_eq!(router.publish(&Topic::posts(), make_test_event("1")), 0);
    }

    #[test]
    fn test_publish_only_reaches_topic() {
        let router = TopicRouter::new();
        let posts = router.subscribe(Topic::posts());
        let comments = router.subscribe(Topic::comments(&PostId::from("1")));

        let delivered = router.publish(&Topic::posts(), make_test_event("1"));
        assert_eq!(delivered, 1);

        let event = posts.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(event, make_test_event("1"));

        // Should NOT receive
        assert!(comments.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_fan_out_preserves_order() {
        let router = TopicRouter::new();
        let first = router.subscribe(Topic::posts());
        let second = router.subscribe(Topic::posts());

        for id in ["1", "2", "3"] {
            assert_eq!(router.publish(&Topic::posts(), make_test_event(id)), 2);
        }

        let expected: Vec<_> = ["1", "2", "3"].into_iter().map(make_test_event).collect();
        assert_eq!(first.drain(), expected);
        assert_eq!(second.drain(), expected);
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let router = TopicRouter::with_config(SubscriptionConfig::bounded(2));
        let slow = router.subscribe(Topic::posts());
        let fast = router.subscribe(Topic::posts());

        for i in 0..10 {
            router.publish(&Topic::posts(), make_test_event(&i.to_string()));
            fast.drain();
        }

        // Slow subscriber was dropped, fast one survives
        assert_eq!(router.subscription_count(), 1);

        // The dropped subscriber still sees what was buffered, then the end.
        let remaining: Vec<_> = slow.take(10).collect();
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_zero_buffer_size_still_delivers() {
        let router = TopicRouter::with_config(SubscriptionConfig {
            buffer_size: Some(0),
        });
        let handle = router.subscribe(Topic::posts());

        assert_eq!(router.publish(&Topic::posts(), make_test_event("1")), 1);
        assert_eq!(router.subscription_count(), 1);
        assert_eq!(handle.drain(), vec![make_test_event("1")]);
    }

    #[test]
    fn test_unsubscribe_by_id_discards_pending() {
        let router = TopicRouter::new();
        let handle = router.subscribe(Topic::posts());

        router.publish(&Topic::posts(), make_test_event("1"));
        router.publish(&Topic::posts(), make_test_event("2"));
        assert!(router.unsubscribe(handle.id()));

        assert_eq!(handle.try_recv(), Err(TryRecvError::Disconnected));
        assert!(handle.drain().is_empty());
    }

    #[test]
    fn test_publish_reaps_disconnected_queue() {
        let router = TopicRouter::new();
        let (sender, receiver) = bounded(4);
        router
            .inner
            .topics
            .lock()
            .entry(Topic::posts())
            .or_default()
            .push(Subscriber {
                id: SubscriptionId(99),
                sender,
                cancelled: Arc::default(),
            });
        drop(receiver);

        assert_eq!(router.publish(&Topic::posts(), make_test_event("1")), 0);
        assert_eq!(router.subscription_count(), 0);
    }

    #[test]
    fn test_unbounded_never_drops() {
        let router = TopicRouter::with_config(SubscriptionConfig::unbounded());
        let handle = router.subscribe(Topic::posts());

        for i in 0..5000 {
            router.publish(&Topic::posts(), make_test_event(&i.to_string()));
        }

        assert_eq!(router.subscription_count(), 1);
        assert_eq!(handle.drain().len(), 5000);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let router = TopicRouter::new();
        let mut handle = router.subscribe(Topic::posts());

        router.publish(&Topic::posts(), make_test_event("1"));
        router.publish(&Topic::posts(), make_test_event("2"));

        assert!(handle.cancel());
        assert!(handle.next().is_none());
        assert_eq!(router.publish(&Topic::posts(), make_test_event("3")), 0);
    }

    #[test]
    fn test_dropping_handle_unsubscribes() {
        let router = TopicRouter::new();
        {
            let _handle = router.subscribe(Topic::posts());
            assert_eq!(router.subscriber_count(&Topic::posts()), 1);
        }
        assert_eq!(router.subscriber_count(&Topic::posts()), 0);
    }

    #[test]
    fn test_iterator_ends_when_router_dropped() {
        let router = TopicRouter::new();
        let handle = router.subscribe(Topic::posts());
        router.publish(&Topic::posts(), make_test_event("1"));
        drop(router);

        let events: Vec<_> = handle.collect();
        assert_eq!(events, vec![make_test_event("1")]);
    }

    #[test]
    fn test_blocking_consumer_does_not_stall_publisher() {
        let router = TopicRouter::new();
        let mut handle = router.subscribe(Topic::posts());

        let consumer = thread::spawn(move || {
            let first = handle.next();
            (first, handle)
        });

        // Idle subscriber on the same topic never reads.
        let _idle = router.subscribe(Topic::posts());
        router.publish(&Topic::posts(), make_test_event("1"));

        let (first, _handle) = consumer.join().unwrap();
        assert_eq!(first, Some(make_test_event("1")));
    }

    #[test]
    fn test_cancel_concurrent_with_publish() {
        let router = TopicRouter::new();
        let handles: Vec<_> = (0..8).map(|_| router.subscribe(Topic::posts())).collect();

        let publisher = {
            let router = router.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    router.publish(&Topic::posts(), make_test_event(&i.to_string()));
                }
            })
        };

        for handle in &handles {
            handle.cancel();
        }
        publisher.join().unwrap();

        assert_eq!(router.subscription_count(), 0);
    }
}
