//! In-memory index store.
//!
//! The index is the system of record for search: a volatile id→document
//! map rebuilt wholesale from the record store. [`IndexStore`] keeps the
//! storage strategy swappable; [`MemoryIndex`] is the default, an ordered
//! map chosen for deterministic iteration (facets, suggestions, and
//! tie-breaking behave identically across runs).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::document::Document;

/// Storage abstraction over the current set of indexed documents.
pub trait IndexStore: Send + Sync {
    /// Drop all documents. Idempotent.
    fn clear(&mut self);

    /// Insert or replace by document id.
    fn upsert(&mut self, doc: Document);

    /// Delete if present; a missing id is not an error.
    fn remove(&mut self, id: &str);

    fn get(&self, id: &str) -> Option<&Document>;

    /// Iterate all documents. Restartable; calling again starts over.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Document> + 'a>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default in-memory index backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: BTreeMap<String, Document>,
    last_rebuild: Option<DateTime<Utc>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a full rebuild just completed. Drives both the
    /// staleness check and the `last_update` statistic.
    pub fn mark_rebuilt(&mut self) {
        self.last_rebuild = Some(Utc::now());
    }

    /// When the last full rebuild completed, if ever.
    pub fn last_rebuild(&self) -> Option<DateTime<Utc>> {
        self.last_rebuild
    }
}

impl IndexStore for MemoryIndex {
    fn clear(&mut self) {
        self.docs.clear();
    }

    fn upsert(&mut self, doc: Document) {
        self.docs.insert(doc.id.clone(), doc);
    }

    fn remove(&mut self, id: &str) {
        self.docs.remove(id);
    }

    fn get(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Document> + 'a> {
        Box::new(self.docs.values())
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::models::{Metadata, Project};

    fn doc(id: &str, name: &str) -> Document {
        Document::from_project(&Project {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            status: "active".to_string(),
            metadata: Metadata::default(),
            created_at: String::new(),
            updated_at: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut index = MemoryIndex::new();
        index.upsert(doc("p1", "First"));
        index.upsert(doc("p1", "Second"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("p1").unwrap().title, "Second");
    }

    #[test]
    fn test_upsert_idempotent_for_unchanged_record() {
        let mut index = MemoryIndex::new();
        index.upsert(doc("p1", "Same"));
        let first = index.get("p1").unwrap().clone();
        index.upsert(doc("p1", "Same"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("p1").unwrap(), &first);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut index = MemoryIndex::new();
        index.upsert(doc("p1", "Only"));
        index.remove("nope");
        assert_eq!(index.len(), 1);
        index.remove("p1");
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut index = MemoryIndex::new();
        index.upsert(doc("p1", "One"));
        index.clear();
        index.clear();
        assert!(index.is_empty());
    }

    #[test]
    fn test_iter_is_restartable_and_ordered() {
        let mut index = MemoryIndex::new();
        index.upsert(doc("b", "B"));
        index.upsert(doc("a", "A"));
        let ids: Vec<&str> = index.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        // A second pass yields the same sequence.
        let again: Vec<&str> = index.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_rebuild_watermark() {
        let mut index = MemoryIndex::new();
        assert!(index.last_rebuild().is_none());
        index.mark_rebuilt();
        assert!(index.last_rebuild().is_some());
    }
}
