//! Process-wide memo of fetched content, keyed by video reference.

use crate::fetcher::Content;
use std::collections::HashMap;

/// Previously fetched content per reference.
///
/// Entries live until invalidated or cleared. Only successful fetches are
/// stored.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, Content>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(reference: &str) -> &str {
        reference.trim()
    }

    /// Look up the content cached for a reference.
    pub fn get(&self, reference: &str) -> Option<Content> {
        self.entries.get(Self::key(reference)).cloned()
    }

    /// Store content for a reference, replacing any previous entry.
    pub fn insert(&mut self, reference: &str, content: Content) {
        self.entries.insert(Self::key(reference).to_string(), content);
    }

    /// Drop the entry for one reference. Returns whether one existed.
    pub fn invalidate(&mut self, reference: &str) -> bool {
        self.entries.remove(Self::key(reference)).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
