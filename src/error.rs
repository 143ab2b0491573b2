//! Error types for the content store.

use crate::types::{CommentId, PostId, UserId};
use thiserror::Error;

/// Main error type for store operations.
///
/// Every variant is a caller-input problem: errors are raised before any
/// mutation takes place, so a failed operation leaves the store untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Post not found or not published: {0}")]
    PublishedPostNotFound(PostId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Email taken: {0}")]
    EmailTaken(String),
}

/// Coarse classification of a [`StoreError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// An id did not resolve (or resolved to an unpublished post).
    NotFound,
    /// Email uniqueness violation.
    DuplicateEmail,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::UserNotFound(_)
            | StoreError::PostNotFound(_)
            | StoreError::PublishedPostNotFound(_)
            | StoreError::CommentNotFound(_) => ErrorKind::NotFound,
            StoreError::EmailTaken(_) => ErrorKind::DuplicateEmail,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
