//! The three backing collections.

use super::collection::Collection;
use crate::types::{
    Comment, CommentId, CreateCommentInput, CreatePostInput, CreateUserInput, Post, PostId,
    StoreStats, User, UserId,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Entity store shared between the mutation engine, the subscription gateway
/// and the query engine. Writers take the write lock for a whole mutation.
pub type SharedEntities = Arc<RwLock<EntityStore>>;

/// Holds users, posts and comments.
///
/// A plain container: `create_*` append with a freshly generated id and never
/// check uniqueness or references.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    users: Collection<User>,
    posts: Collection<Post>,
    comments: Collection<Comment>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a small demo dataset.
    pub fn demo() -> Self {
        let mut store = Self::new();

        for (id, name, email, age) in [
            ("1", "Bob", "bob@emailemail.com", 30),
            ("2", "Mike", "mike@emailemail.com", 43),
            ("3", "Bill", "bill@emailemail.com", 45),
            ("4", "Sarah", "sarah@emailemail.com", 27),
        ] {
            store.users.insert(User {
                id: UserId::from(id),
                name: name.to_string(),
                email: email.to_string(),
                age: Some(age),
            });
        }

        for (id, title, body, published, author) in [
            ("001", "My first post", "This is my first post.", true, "4"),
            ("002", "How to make a pancake", "This is how to do it.", false, "2"),
            ("003", "Javascript is great!", "It is interesting to learn javascript...", true, "2"),
            ("004", "What about C++??", "Shall I learn C++...?", true, "1"),
        ] {
            store.posts.insert(Post {
                id: PostId::from(id),
                title: title.to_string(),
                body: body.to_string(),
                published,
                author: UserId::from(author),
            });
        }

        for (id, text, author, post) in [
            ("100", "This is a great post", "4", "001"),
            ("200", "This post is cool!", "2", "002"),
            ("300", "Here is my comments...", "1", "004"),
        ] {
            store.comments.insert(Comment {
                id: CommentId::from(id),
                text: text.to_string(),
                author: UserId::from(author),
                post: PostId::from(post),
            });
        }

        store
    }

    // --- Creation ---

    /// Insert a user under a fresh id. No validation.
    pub fn create_user(&mut self, input: CreateUserInput) -> User {
        self.users
            .insert(User {
                id: UserId::generate(),
                name: input.name,
                email: input.email,
                age: input.age,
            })
            .clone()
    }

    /// Insert a post under a fresh id. No validation.
    pub fn create_post(&mut self, input: CreatePostInput) -> Post {
        self.posts
            .insert(Post {
                id: PostId::generate(),
                title: input.title,
                body: input.body,
                published: input.published,
                author: input.author,
            })
            .clone()
    }

    /// Insert a comment under a fresh id. No validation.
    pub fn create_comment(&mut self, input: CreateCommentInput) -> Comment {
        self.comments
            .insert(Comment {
                id: CommentId::generate(),
                text: input.text,
                author: input.author,
                post: input.post,
            })
            .clone()
    }

    // --- Collections ---

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut Collection<User> {
        &mut self.users
    }

    pub fn posts(&self) -> &Collection<Post> {
        &self.posts
    }

    pub fn posts_mut(&mut self) -> &mut Collection<Post> {
        &mut self.posts
    }

    pub fn comments(&self) -> &Collection<Comment> {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Collection<Comment> {
        &mut self.comments
    }

    /// Entity counts. `subscription_count` is left at zero.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            user_count: self.users.len(),
            post_count: self.posts.len(),
            comment_count: self.comments.len(),
            subscription_count: 0,
        }
    }

    /// Wrap the store for sharing between engines.
    pub fn into_shared(self) -> SharedEntities {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_fresh_ids() {
        let mut store = EntityStore::new();

        let a = store.create_user(CreateUserInput::new("Ann", "ann@example.com"));
        let b = store.create_user(CreateUserInput::new("Ann", "ann@example.com"));

        // The store itself does not enforce email uniqueness.
        assert_ne!(a.id, b.id);
        assert_eq!(store.users().len(), 2);
    }

    #[test]
    fn test_create_post_and_comment() {
        let mut store = EntityStore::new();
        let user = store.create_user(CreateUserInput::new("Ann", "ann@example.com").with_age(30));
        let post = store.create_post(CreatePostInput::new("t", "b", true, user.id.clone()));
        let comment = store.create_comment(CreateCommentInput::new(
            "hi",
            user.id.clone(),
            post.id.clone(),
        ));

        assert_eq!(store.posts().get(&post.id), Some(&post));
        assert_eq!(store.comments().get(&comment.id).unwrap().post, post.id);
        assert_eq!(store.users().get(&user.id).unwrap().age, Some(30));
    }

    #[test]
    fn test_demo_dataset() {
        let store = EntityStore::demo();
        let stats = store.stats();

        assert_eq!(stats.user_count, 4);
        assert_eq!(stats.post_count, 4);
        assert_eq!(stats.comment_count, 3);

        let pancake = store.posts().get(&PostId::from("002")).unwrap();
        assert!(!pancake.published);
        assert_eq!(pancake.author, UserId::from("2"));
    }
}
