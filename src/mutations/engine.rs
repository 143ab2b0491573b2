//! Write operations and their notifications.

use super::visibility::{created_post_event, deleted_post_event, PostTransition};
use crate::entities::SharedEntities;
use crate::error::{Result, StoreError};
use crate::subscriptions::TopicRouter;
use crate::types::{
    Comment, CommentId, CreateCommentInput, CreatePostInput, CreateUserInput, MutationKind, Post,
    PostId, StoreEvent, Topic, UpdateCommentInput, UpdatePostInput, UpdateUserInput, User, UserId,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// Applies mutations to the entity store and publishes the resulting events.
///
/// Every operation validates first and only then writes, all under the
/// store's write lock. Events are published before the lock is released so
/// that per-topic event order always matches mutation order.
#[derive(Clone)]
pub struct MutationEngine {
    entities: SharedEntities,
    router: TopicRouter,
}

impl MutationEngine {
    /// Create an engine writing to `entities` and publishing on `router`.
    pub fn new(entities: SharedEntities, router: TopicRouter) -> Self {
        Self { entities, router }
    }

    // --- Users ---

    /// Add a user. Fails if the email is already taken. Publishes nothing.
    pub fn create_user(&self, input: CreateUserInput) -> Result<User> {
        let mut entities = self.entities.write();

        if entities.users().any(|user| user.email == input.email) {
            return Err(StoreError::EmailTaken(input.email));
        }

        let user = entities.create_user(input);
        debug!(user = %user.id, "created user");
        Ok(user)
    }

    /// Apply the fields present in `input`. The email may be kept as is but
    /// not taken from another user.
    pub fn update_user(&self, id: &UserId, input: UpdateUserInput) -> Result<User> {
        let mut entities = self.entities.write();

        if !entities.users().contains(id) {
            return Err(StoreError::UserNotFound(id.clone()));
        }
        if let Some(email) = &input.email {
            if entities
                .users()
                .any(|user| user.email == *email && user.id != *id)
            {
                return Err(StoreError::EmailTaken(email.clone()));
            }
        }

        let user = entities
            .users_mut()
            .get_mut(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(age) = input.age {
            user.age = age;
        }

        debug!(user = %id, "updated user");
        Ok(user.clone())
    }

    /// Remove a user with their posts, the comments on those posts, and every
    /// comment they wrote.
    ///
    /// Publishes nothing, not even for published posts removed by the cascade.
    pub fn delete_user(&self, id: &UserId) -> Result<User> {
        let mut entities = self.entities.write();

        let user = entities
            .users_mut()
            .remove(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;

        let removed_posts: HashSet<PostId> = entities
            .posts_mut()
            .retain(|post| post.author != *id)
            .into_iter()
            .map(|post| post.id)
            .collect();
        let removed_comments = entities
            .comments_mut()
            .retain(|comment| comment.author != *id && !removed_posts.contains(&comment.post));

        info!(
            user = %id,
            posts = removed_posts.len(),
            comments = removed_comments.len(),
            "deleted user"
        );
        Ok(user)
    }

    // --- Posts ---

    /// Add a post for an existing author. Announced only if published.
    pub fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        let mut entities = self.entities.write();

        if !entities.users().contains(&input.author) {
            return Err(StoreError::UserNotFound(input.author));
        }

        let post = entities.create_post(input);
        debug!(post = %post.id, published = post.published, "created post");

        if let Some(event) = created_post_event(&post) {
            self.emit(Topic::posts(), event);
        }
        Ok(post)
    }

    /// Apply the fields present in `input` and notify by visibility change.
    ///
    /// Unpublishing reports `DELETED` with the pre-update post, publishing
    /// reports `CREATED`, any other change to a published post reports
    /// `UPDATED`, and changes to an unpublished post stay silent.
    pub fn update_post(&self, id: &PostId, input: UpdatePostInput) -> Result<Post> {
        let mut entities = self.entities.write();

        let post = entities
            .posts_mut()
            .get_mut(id)
            .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;
        let before = post.clone();

        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(body) = input.body {
            post.body = body;
        }
        if let Some(published) = input.published {
            post.published = published;
        }
        let after = post.clone();

        let transition = PostTransition::classify(before.published, input.published);
        debug!(post = %id, ?transition, "updated post");

        if let Some(event) = transition.event(&before, &after) {
            self.emit(Topic::posts(), event);
        }
        Ok(after)
    }

    /// Remove a post and its comments. Only a published post's removal is
    /// announced.
    pub fn delete_post(&self, id: &PostId) -> Result<Post> {
        let mut entities = self.entities.write();

        let post = entities
            .posts_mut()
            .remove(id)
            .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;
        let removed_comments = entities
            .comments_mut()
            .retain(|comment| comment.post != *id);

        info!(post = %id, comments = removed_comments.len(), "deleted post");

        if let Some(event) = deleted_post_event(&post) {
            self.emit(Topic::posts(), event);
        }
        Ok(post)
    }

    // --- Comments ---

    /// Comments can only be added to published posts, so their creation is
    /// always announced on the post's comment topic.
    pub fn create_comment(&self, input: CreateCommentInput) -> Result<Comment> {
        let mut entities = self.entities.write();

        if !entities
            .posts()
            .any(|post| post.id == input.post && post.published)
        {
            return Err(StoreError::PublishedPostNotFound(input.post));
        }
        if !entities.users().contains(&input.author) {
            return Err(StoreError::UserNotFound(input.author));
        }

        let comment = entities.create_comment(input);
        debug!(comment = %comment.id, post = %comment.post, "created comment");

        self.emit(
            Topic::comments(&comment.post),
            StoreEvent::comment(MutationKind::Created, comment.clone()),
        );
        Ok(comment)
    }

    /// Edit a comment. Always announced on its post's comment topic.
    pub fn update_comment(&self, id: &CommentId, input: UpdateCommentInput) -> Result<Comment> {
        let mut entities = self.entities.write();

        let comment = entities
            .comments_mut()
            .get_mut(id)
            .ok_or_else(|| StoreError::CommentNotFound(id.clone()))?;
        if let Some(text) = input.text {
            comment.text = text;
        }
        let comment = comment.clone();
        debug!(comment = %id, "updated comment");

        self.emit(
            Topic::comments(&comment.post),
            StoreEvent::comment(MutationKind::Updated, comment.clone()),
        );
        Ok(comment)
    }

    /// Remove a comment. Always announced on its post's comment topic.
    pub fn delete_comment(&self, id: &CommentId) -> Result<Comment> {
        let mut entities = self.entities.write();

        let comment = entities
            .comments_mut()
            .remove(id)
            .ok_or_else(|| StoreError::CommentNotFound(id.clone()))?;
        debug!(comment = %id, "deleted comment");

        self.emit(
            Topic::comments(&comment.post),
            StoreEvent::comment(MutationKind::Deleted, comment.clone()),
        );
        Ok(comment)
    }

    fn emit(&self, topic: Topic, event: StoreEvent) {
        let mutation = event.mutation();
        let delivered = self.router.publish(&topic, event);
        debug!(topic = %topic, %mutation, delivered, "emitted event");
    }
}
