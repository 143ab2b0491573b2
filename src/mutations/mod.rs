//! Mutation engine.
//!
//! Each write validates its preconditions, mutates the entity store, and then
//! publishes zero or more events. Post events follow visibility (see
//! [`PostTransition`]); comment events are always published on the
//! `comment:<postId>` topic of the comment's post.

mod engine;
mod visibility;

pub use engine::MutationEngine;
pub use visibility::{created_post_event, deleted_post_event, PostTransition};
