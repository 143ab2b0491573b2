//! Topic-based subscription system.
//!
//! Mutations publish [`StoreEvent`](crate::StoreEvent)s on named topics; each
//! subscriber owns a queue bound to one topic. Publishing is fire-and-forget:
//! - events published with nobody bound are dropped, there is no replay
//! - `publish` only ever `try_send`s, so a slow consumer cannot stall it
//! - a bounded queue that overflows gets its subscriber dropped
//!
//! # Example
//!
//! ```ignore
//! let router = TopicRouter::new();
//! let handle = router.subscribe(Topic::posts());
//!
//! for event in handle {
//!     match event {
//!         StoreEvent::Post { mutation, data } => println!("{} {}", mutation, data.title),
//!         StoreEvent::Comment { .. } => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::TopicRouter;
pub use types::{SubscriptionConfig, SubscriptionHandle, SubscriptionId, DEFAULT_BUFFER_SIZE};
