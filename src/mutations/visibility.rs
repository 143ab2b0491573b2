//! Post visibility transitions.
//!
//! Subscribers of the post topic only ever see published posts, so events
//! follow what became visible or invisible rather than the raw write verb:
//! publishing an existing post reads as a creation, unpublishing it as a
//! deletion.

use crate::types::{MutationKind, Post, StoreEvent};

/// What a post update looks like from the post topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostTransition {
    /// `published` went true -> false.
    Unpublished,
    /// `published` went false -> true.
    Published,
    /// `published` untouched on a visible post.
    Edited,
    /// Nothing a subscriber could observe.
    Silent,
}

impl PostTransition {
    /// Classify an update from the pre-update flag and the requested flag.
    ///
    /// A `published` value equal to the current one is not a transition and
    /// does not count as an edit either.
    pub fn classify(was_published: bool, requested: Option<bool>) -> Self {
        match (was_published, requested) {
            (true, Some(false)) => PostTransition::Unpublished,
            (false, Some(true)) => PostTransition::Published,
            (true, None) => PostTransition::Edited,
            _ => PostTransition::Silent,
        }
    }

    /// Build the event to publish. `before` is the pre-update snapshot,
    /// `after` the stored post.
    pub fn event(self, before: &Post, after: &Post) -> Option<StoreEvent> {
        match self {
            PostTransition::Unpublished => {
                Some(StoreEvent::post(MutationKind::Deleted, before.clone()))
            }
            PostTransition::Published => {
                Some(StoreEvent::post(MutationKind::Created, after.clone()))
            }
            PostTransition::Edited => Some(StoreEvent::post(MutationKind::Updated, after.clone())),
            PostTransition::Silent => None,
        }
    }
}

/// Event for a newly created post; unpublished posts are invisible.
pub fn created_post_event(post: &Post) -> Option<StoreEvent> {
    post.published
        .then(|| StoreEvent::post(MutationKind::Created, post.clone()))
}

/// Event for a removed post; removing an unpublished post is silent.
pub fn deleted_post_event(post: &Post) -> Option<StoreEvent> {
    post.published
        .then(|| StoreEvent::post(MutationKind::Deleted, post.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PostId, UserId};

    fn post(published: bool) -> Post {
        Post {
            id: PostId::from("001"),
            title: "title".into(),
            body: "body".into(),
            published,
            author: UserId::from("1"),
        }
    }

    #[test]
    fn test_classify_table() {
        use PostTransition::*;

        let cases = [
            (true, Some(false), Unpublished),
            (false, Some(true), Published),
            (true, None, Edited),
            (true, Some(true), Silent),
            (false, Some(false), Silent),
            (false, None, Silent),
        ];

        for (was, requested, expected) in cases {
            assert_eq!(
                PostTransition::classify(was, requested),
                expected,
                "was_published={} requested={:?}",
                was,
                requested
            );
        }
    }

    #[test]
    fn test_unpublish_carries_pre_update_snapshot() {
        let before = post(true);
        let mut after = before.clone();
        after.published = false;
        after.title = "renamed".into();

        let event = PostTransition::Unpublished.event(&before, &after).unwrap();
        assert_eq!(event, StoreEvent::post(MutationKind::Deleted, before));
    }

    #[test]
    fn test_publish_carries_updated_post() {
        let before = post(false);
        let after = post(true);

        let event = PostTransition::Published.event(&before, &after).unwrap();
        assert_eq!(event, StoreEvent::post(MutationKind::Created, after));
    }

    #[test]
    fn test_create_and_delete_visibility() {
        assert_eq!(created_post_event(&post(false)), None);
        assert_eq!(
            created_post_event(&post(true)).map(|e| e.mutation()),
            Some(MutationKind::Created)
        );
        assert_eq!(deleted_post_event(&post(false)), None);
        assert_eq!(
            deleted_post_event(&post(true)).map(|e| e.mutation()),
            Some(MutationKind::Deleted)
        );
    }
}
