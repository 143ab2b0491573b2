//! Entity storage.
//!
//! Users, posts and comments live in insertion-ordered collections inside a
//! single [`EntityStore`], which is shared behind one `RwLock` so that all
//! mutations run as serialized critical sections.

mod collection;
mod store;

pub use collection::{Collection, Entity};
pub use store::{EntityStore, SharedEntities};
