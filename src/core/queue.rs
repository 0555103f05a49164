//! The "up next" queue: an ordered list of todo ids without duplicates.
//! Index 0 is the next task.

use serde::{Deserialize, Serialize};

/// Key under which the queue is stored.
pub const STORAGE_KEY: &str = "productivity-queue";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Queue {
    items: Vec<String>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut q = Self::new();
        for id in ids {
            q.add(id);
        }
        q
    }

    pub fn ids(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append at the end. Returns false if the id was already queued.
    pub fn add(&mut self, todo_id: impl Into<String>) -> bool {
        let todo_id = todo_id.into();
        if self.contains(&todo_id) {
            return false;
        }
        self.items.push(todo_id);
        true
    }

    pub fn remove(&mut self, todo_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|id| id != todo_id);
        self.items.len() != before
    }

    /// Move the item at `from` to `to`. A `to` past the end moves it last;
    /// a `from` out of range changes nothing.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        true
    }

    /// Place `todo_id` at `index`, moving it if it is already queued.
    pub fn insert_at(&mut self, todo_id: impl Into<String>, index: usize) {
        let todo_id = todo_id.into();
        self.remove(&todo_id);
        let index = index.min(self.items.len());
        self.items.insert(index, todo_id);
    }

    pub fn peek(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn pop(&mut self) -> Option<String> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn contains(&self, todo_id: &str) -> bool {
        self.items.iter().any(|id| id == todo_id)
    }

    pub fn position(&self, todo_id: &str) -> Option<usize> {
        self.items.iter().position(|id| id == todo_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First queued id other than `skip`.
    pub fn next_after(&self, skip: Option<&str>) -> Option<&str> {
        self.items
            .iter()
            .map(String::as_str)
            .find(|id| Some(*id) != skip)
    }
}
