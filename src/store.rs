//! Main Store struct tying all components together.

use crate::entities::{EntityStore, SharedEntities};
use crate::gateway::SubscriptionGateway;
use crate::mutations::MutationEngine;
use crate::queries::QueryEngine;
use crate::subscriptions::{SubscriptionConfig, TopicRouter};
use crate::types::StoreStats;
use tracing::info;

/// Store configuration.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Subscriber queue settings.
    pub subscriptions: SubscriptionConfig,

    /// Start with the demo users, posts and comments.
    pub seed_demo_data: bool,
}

/// The content store.
///
/// Owns the entity store and the topic router and hands out the three
/// surfaces built on them:
/// - [`MutationEngine`] for writes and their notifications
/// - [`SubscriptionGateway`] for validated subscriptions
/// - [`QueryEngine`] for reads
pub struct Store {
    entities: SharedEntities,
    router: TopicRouter,
    mutations: MutationEngine,
    gateway: SubscriptionGateway,
    queries: QueryEngine,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        let entities = if config.seed_demo_data {
            EntityStore::demo()
        } else {
            EntityStore::new()
        };
        Self::with_entities(entities, config.subscriptions)
    }

    /// Build a store around existing entities.
    pub fn with_entities(entities: EntityStore, subscriptions: SubscriptionConfig) -> Self {
        let stats = entities.stats();
        let entities = entities.into_shared();
        let router = TopicRouter::with_config(subscriptions);

        info!(
            users = stats.user_count,
            posts = stats.post_count,
            comments = stats.comment_count,
            "store ready"
        );

        Self {
            mutations: MutationEngine::new(entities.clone(), router.clone()),
            gateway: SubscriptionGateway::new(entities.clone(), router.clone()),
            queries: QueryEngine::new(entities.clone()),
            entities,
            router,
        }
    }

    /// Write operations.
    pub fn mutations(&self) -> &MutationEngine {
        &self.mutations
    }

    /// Subscription entry points with their validation.
    pub fn subscriptions(&self) -> &SubscriptionGateway {
        &self.gateway
    }

    /// Read-only lookups and search.
    pub fn queries(&self) -> &QueryEngine {
        &self.queries
    }

    /// The underlying router, for raw topic subscriptions.
    pub fn router(&self) -> &TopicRouter {
        &self.router
    }

    /// Entity and subscription counts.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.entities.read().stats();
        stats.subscription_count = self.router.subscription_count();
        stats
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
