//! Read surface over the entity store.

use crate::entities::SharedEntities;
use crate::types::{Comment, CommentId, Post, PostId, User, UserId};

/// Case-insensitive substring match.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Searches and lookups. Every result is an owned snapshot taken under the
/// read lock.
#[derive(Clone)]
pub struct QueryEngine {
    entities: SharedEntities,
}

impl QueryEngine {
    /// Create a query engine over shared entities.
    pub fn new(entities: SharedEntities) -> Self {
        Self { entities }
    }

    // --- Search ---

    /// All users, or those whose name contains `query`.
    pub fn users(&self, query: Option<&str>) -> Vec<User> {
        let entities = self.entities.read();
        match query {
            Some(query) => entities
                .users()
                .filter(|user| contains_ignore_case(&user.name, query)),
            None => entities.users().to_vec(),
        }
    }

    /// All posts, or those whose title or body contains `query`.
    pub fn posts(&self, query: Option<&str>) -> Vec<Post> {
        let entities = self.entities.read();
        match query {
            Some(query) => entities.posts().filter(|post| {
                contains_ignore_case(&post.title, query) || contains_ignore_case(&post.body, query)
            }),
            None => entities.posts().to_vec(),
        }
    }

    /// All comments, or those whose text contains `query`.
    pub fn comments(&self, query: Option<&str>) -> Vec<Comment> {
        let entities = self.entities.read();
        match query {
            Some(query) => entities
                .comments()
                .filter(|comment| contains_ignore_case(&comment.text, query)),
            None => entities.comments().to_vec(),
        }
    }

    // --- Lookup ---

    /// Look up a user by id.
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.entities.read().users().get(id).cloned()
    }

    /// Look up a post by id, published or not.
    pub fn post(&self, id: &PostId) -> Option<Post> {
        self.entities.read().posts().get(id).cloned()
    }

    /// Look up a comment by id.
    pub fn comment(&self, id: &CommentId) -> Option<Comment> {
        self.entities.read().comments().get(id).cloned()
    }

    // --- Relations ---

    /// Posts written by `author`, in insertion order.
    pub fn posts_by_author(&self, author: &UserId) -> Vec<Post> {
        self.entities
            .read()
            .posts()
            .filter(|post| post.author == *author)
    }

    /// Comments written by `author`, in insertion order.
    pub fn comments_by_author(&self, author: &UserId) -> Vec<Comment> {
        self.entities
            .read()
            .comments()
            .filter(|comment| comment.author == *author)
    }

    /// Comments attached to `post`, in insertion order.
    pub fn comments_on_post(&self, post: &PostId) -> Vec<Comment> {
        self.entities
            .read()
            .comments()
            .filter(|comment| comment.post == *post)
    }
}
