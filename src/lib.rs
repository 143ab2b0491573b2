//! # Content Store
//!
//! An in-memory store of users, posts and comments whose mutations notify
//! subscribers through topic-based channels.
//!
//! ## Core Concepts
//!
//! - **Entities**: users, posts and comments linked by id
//! - **Topics**: `"post"` for every post, `"comment:<postId>"` per post
//! - **Visibility**: only published posts are visible to subscribers, so
//!   publishing reads as `CREATED` and unpublishing as `DELETED`
//! - **Cascades**: deleting a user or post removes what depends on it
//!
//! ## Example
//!
//! ```ignore
//! use postwire::{CreatePostInput, CreateUserInput, Store, StoreConfig, UpdatePostInput};
//!
//! let store = Store::new(StoreConfig::default());
//! let feed = store.subscriptions().subscribe_to_posts();
//!
//! let user = store
//!     .mutations()
//!     .create_user(CreateUserInput::new("Sarah", "sarah@example.com"))?;
//! let post = store
//!     .mutations()
//!     .create_post(CreatePostInput::new("Hello", "World", true, user.id))?;
//!
//! // Unpublishing announces a deletion.
//! store
//!     .mutations()
//!     .update_post(&post.id, UpdatePostInput::new().with_published(false))?;
//!
//! for event in feed.drain() {
//!     println!("{:?}", event.mutation());
//! }
//! ```

pub mod entities;
pub mod error;
pub mod gateway;
pub mod mutations;
pub mod queries;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use entities::{Collection, Entity, EntityStore, SharedEntities};
pub use error::{ErrorKind, Result, StoreError};
pub use gateway::SubscriptionGateway;
pub use mutations::{MutationEngine, PostTransition};
pub use queries::QueryEngine;
pub use store::{Store, StoreConfig};
pub use subscriptions::{SubscriptionConfig, SubscriptionHandle, SubscriptionId, TopicRouter};
pub use types::*;
