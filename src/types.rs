//! Core types for the content store.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh, random identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a user.
    UserId
);
entity_id!(
    /// Unique identifier for a post.
    PostId
);
entity_id!(
    /// Unique identifier for a comment.
    CommentId
);

// --- Entities ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across all users.
    pub email: String,
    pub age: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// Unpublished posts are invisible to subscribers.
    pub published: bool,
    pub author: UserId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: UserId,
    pub post: PostId,
}

// --- Mutation Inputs ---

/// Input for creating a user (before id assigned).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
}

impl CreateUserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

/// Partial update for a user. `None` leaves a field untouched.
///
/// `age` is doubly optional: `Some(None)` clears the age, `None` keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Option<u32>>,
}

impl UpdateUserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the age, or clear it with `None`.
    pub fn with_age(mut self, age: Option<u32>) -> Self {
        self.age = Some(age);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: UserId,
}

impl CreatePostInput {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        published: bool,
        author: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            published,
            author,
        }
    }
}

/// Partial update for a post. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl UpdatePostInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub text: String,
    pub author: UserId,
    pub post: PostId,
}

impl CreateCommentInput {
    pub fn new(text: impl Into<String>, author: UserId, post: PostId) -> Self {
        Self {
            text: text.into(),
            author,
            post,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl UpdateCommentInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Maps a present field (even an explicit `null`) to `Some`, so that an
/// absent field can stay `None` through `#[serde(default)]`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// --- Events ---

/// Lifecycle verb carried by every event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationKind::Created => "CREATED",
            MutationKind::Updated => "UPDATED",
            MutationKind::Deleted => "DELETED",
        };
        f.write_str(s)
    }
}

/// Events delivered to subscribers.
///
/// Serializes as `{"post": {"mutation": "CREATED", "data": {...}}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    Post { mutation: MutationKind, data: Post },
    Comment { mutation: MutationKind, data: Comment },
}

impl StoreEvent {
    /// Event for the post topic.
    pub fn post(mutation: MutationKind, data: Post) -> Self {
        StoreEvent::Post { mutation, data }
    }

    /// Event for a comment topic.
    pub fn comment(mutation: MutationKind, data: Comment) -> Self {
        StoreEvent::Comment { mutation, data }
    }

    /// The lifecycle verb of this event.
    pub fn mutation(&self) -> MutationKind {
        match self {
            StoreEvent::Post { mutation, .. } | StoreEvent::Comment { mutation, .. } => *mutation,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            StoreEvent::Post { data, .. } => Some(data),
            StoreEvent::Comment { .. } => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            StoreEvent::Comment { data, .. } => Some(data),
            StoreEvent::Post { .. } => None,
        }
    }
}

// --- Topics ---

/// Name of the shared post topic.
pub const POST_TOPIC: &str = "post";

/// Prefix of the per-post comment topics.
pub const COMMENT_TOPIC_PREFIX: &str = "comment:";

/// A named notification channel.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Topic with an arbitrary name.
    pub fn new(name: impl Into<String>) -> Self {
        Topic(name.into())
    }

    /// The shared topic for all post lifecycle events.
    pub fn posts() -> Self {
        Topic(POST_TOPIC.to_string())
    }

    /// The topic carrying comment events for one post.
    pub fn comments(post: &PostId) -> Self {
        Topic(format!("{}{}", COMMENT_TOPIC_PREFIX, post))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub user_count: usize,
    pub post_count: usize,
    pub comment_count: usize,
    pub subscription_count: usize,
}
