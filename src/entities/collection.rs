//! Ordered collection of entities.

use crate::types::{Comment, CommentId, Post, PostId, User, UserId};
use std::fmt::Display;
use std::hash::Hash;

/// Something stored in a [`Collection`].
pub trait Entity: Clone {
    type Id: Clone + Eq + Hash + Display;

    fn id(&self) -> &Self::Id;
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &PostId {
        &self.id
    }
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> &CommentId {
        &self.id
    }
}

/// Insertion-ordered backing collection.
///
/// Performs no validation: uniqueness and referential checks belong to the
/// caller.
#[derive(Clone, Debug)]
pub struct Collection<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an entity, returning a reference to the stored copy.
    pub fn insert(&mut self, item: T) -> &T {
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Get an entity by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// First entity matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(*item))
    }

    /// Position of the first entity matching `predicate`.
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().any(predicate)
    }

    /// Clone out every entity matching `predicate`, in insertion order.
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(*item)).cloned().collect()
    }

    /// Remove an entity by id.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let index = self.find_index(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Remove the entity at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Keep only entities matching `predicate`. Returns the removed ones in
    /// their original order.
    pub fn retain<P>(&mut self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let (kept, removed): (Vec<T>, Vec<T>) =
            self.items.drain(..).partition(|item| predicate(item));
        self.items = kept;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}
