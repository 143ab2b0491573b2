//! Subscription gateway: validated entry point for subscribers.

use crate::entities::SharedEntities;
use crate::error::{Result, StoreError};
use crate::subscriptions::{SubscriptionHandle, TopicRouter};
use crate::types::{PostId, Topic};
use tracing::debug;

/// Binds callers to topics after checking the request against the store.
#[derive(Clone)]
pub struct SubscriptionGateway {
    entities: SharedEntities,
    router: TopicRouter,
}

impl SubscriptionGateway {
    /// Create a gateway validating against `entities`.
    pub fn new(entities: SharedEntities, router: TopicRouter) -> Self {
        Self { entities, router }
    }

    /// Subscribe to lifecycle events of every published post.
    pub fn subscribe_to_posts(&self) -> SubscriptionHandle {
        self.router.subscribe(Topic::posts())
    }

    /// Subscribe to comment events of one post.
    ///
    /// The post must exist and be published now. The check is not repeated:
    /// if the post is later unpublished or deleted the subscription stays
    /// bound and simply stops receiving events.
    pub fn subscribe_to_comments(&self, post_id: &PostId) -> Result<SubscriptionHandle> {
        // Held across subscribe so no mutation lands between check and bind.
        let entities = self.entities.read();

        if !entities
            .posts()
            .any(|post| post.id == *post_id && post.published)
        {
            debug!(post = %post_id, "rejected comment subscription");
            return Err(StoreError::PublishedPostNotFound(post_id.clone()));
        }

        Ok(self.router.subscribe(Topic::comments(post_id)))
    }
}
