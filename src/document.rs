//! Indexed document representation.
//!
//! A [`Document`] is the derived, search-oriented view of a source record:
//! lowercase searchable text, a precomputed token list, resolved project
//! name, and the original record carried along for display. Documents are
//! built at index time and never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{parse_timestamp, Item, ItemKind, Project};
use crate::tokenizer::tokenize;

/// Placeholder project name when an item's owning project cannot be
/// resolved at index time.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Priority assigned when the source record carries none.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Document type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Project,
    Task,
    Note,
    Snippet,
    Idea,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Project => "project",
            DocType::Task => "task",
            DocType::Note => "note",
            DocType::Snippet => "snippet",
            DocType::Idea => "idea",
        }
    }
}

impl From<ItemKind> for DocType {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Task => DocType::Task,
            ItemKind::Note => DocType::Note,
            ItemKind::Snippet => DocType::Snippet,
            ItemKind::Idea => DocType::Idea,
        }
    }
}

/// The source record behind a document, returned to the caller untouched
/// for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceRecord {
    Project(Project),
    Item(Item),
}

/// An indexed document. Derived from a source record; compare
/// field-for-field to check that re-indexing an unchanged record is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub doc_type: DocType,
    pub title: String,
    pub content: String,
    /// Source tags in insertion order; duplicates are kept as stored.
    pub tags: Vec<String>,
    /// Lowercase concatenation of title, content, tags, and (for items)
    /// the owning project's name. Used for substring containment.
    pub searchable_text: String,
    /// Deduplicated terms from `searchable_text`, deterministic order.
    pub tokens: Vec<String>,
    pub status: String,
    pub priority: String,
    /// Owning project id; `None` for project documents, whose own `id`
    /// serves as project identity.
    pub project_id: Option<String>,
    pub project_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub data: SourceRecord,
}

impl Document {
    /// Build a document from a project record. Returns `None` for a
    /// malformed record (blank id or name) so the caller can skip it
    /// without aborting the surrounding rebuild.
    pub fn from_project(project: &Project) -> Option<Document> {
        if project.id.trim().is_empty() || project.name.trim().is_empty() {
            return None;
        }

        let mut parts: Vec<&str> = vec![&project.name];
        if !project.description.is_empty() {
            parts.push(&project.description);
        }
        parts.extend(project.metadata.tags.iter().map(String::as_str));
        let searchable_text = parts.join(" ").to_lowercase();
        let tokens = tokenize(&searchable_text);

        Some(Document {
            id: project.id.clone(),
            doc_type: DocType::Project,
            title: project.name.clone(),
            content: project.description.clone(),
            tags: project.metadata.tags.clone(),
            searchable_text,
            tokens,
            status: project.status.clone(),
            priority: priority_or_default(&project.metadata.priority),
            project_id: None,
            project_name: project.name.clone(),
            created_at: project.created_at.clone(),
            updated_at: project.updated_at.clone(),
            data: SourceRecord::Project(project.clone()),
        })
    }

    /// Build a document from an item record. `owner` is the resolved
    /// owning project, if any. An unresolvable project is not an error;
    /// the document just carries the placeholder name.
    pub fn from_item(item: &Item, owner: Option<&Project>) -> Option<Document> {
        if item.id.trim().is_empty() || item.title.trim().is_empty() {
            return None;
        }

        let owner_name = owner.map(|p| p.name.as_str()).unwrap_or("");
        let mut parts: Vec<&str> = vec![&item.title];
        if !item.content.is_empty() {
            parts.push(&item.content);
        }
        parts.extend(item.metadata.tags.iter().map(String::as_str));
        if !owner_name.is_empty() {
            parts.push(owner_name);
        }
        let searchable_text = parts.join(" ").to_lowercase();
        let tokens = tokenize(&searchable_text);

        let project_id = if item.project_id.is_empty() {
            None
        } else {
            Some(item.project_id.clone())
        };

        Some(Document {
            id: item.id.clone(),
            doc_type: DocType::from(item.kind),
            title: item.title.clone(),
            content: item.content.clone(),
            tags: item.metadata.tags.clone(),
            searchable_text,
            tokens,
            status: item.status.clone(),
            priority: priority_or_default(&item.metadata.priority),
            project_id,
            project_name: owner
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
            created_at: item.created_at.clone(),
            updated_at: item.updated_at.clone(),
            data: SourceRecord::Item(item.clone()),
        })
    }

    /// Parsed `updated_at`, used for recency boosting and date filtering.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

fn priority_or_default(priority: &Option<String>) -> String {
    match priority {
        Some(p) if !p.trim().is_empty() => p.clone(),
        _ => DEFAULT_PRIORITY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;

    fn project(id: &str, name: &str, description: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status: "active".to_string(),
            metadata: Metadata::default(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-02T00:00:00Z".to_string(),
        }
    }

    fn item(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            project_id: "p1".to_string(),
            title: title.to_string(),
            content: String::new(),
            kind: ItemKind::Task,
            status: "todo".to_string(),
            metadata: Metadata::default(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-02T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_project_document_fields() {
        let doc = Document::from_project(&project("p1", "Website Revamp", "redo the homepage")).unwrap();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.doc_type, DocType::Project);
        assert_eq!(doc.title, "Website Revamp");
        assert_eq!(doc.content, "redo the homepage");
        assert_eq!(doc.searchable_text, "website revamp redo the homepage");
        assert!(doc.tokens.contains(&"homepage".to_string()));
        assert_eq!(doc.project_id, None);
        assert_eq!(doc.project_name, "Website Revamp");
        assert_eq!(doc.priority, "medium");
    }

    #[test]
    fn test_item_searchable_text_includes_project_name() {
        let owner = project("p1", "Website Revamp", "");
        let doc = Document::from_item(&item("t1", "Fix bug"), Some(&owner)).unwrap();
        assert!(doc.searchable_text.contains("website revamp"));
        assert_eq!(doc.project_name, "Website Revamp");
        assert_eq!(doc.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_item_without_owner_uses_placeholder() {
        let doc = Document::from_item(&item("t1", "Fix bug"), None).unwrap();
        assert_eq!(doc.project_name, UNKNOWN_PROJECT);
        assert_eq!(doc.searchable_text, "fix bug");
    }

    #[test]
    fn test_item_kind_maps_to_doc_type() {
        let mut it = item("n1", "Meeting notes");
        it.kind = ItemKind::Note;
        let doc = Document::from_item(&it, None).unwrap();
        assert_eq!(doc.doc_type, DocType::Note);
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        let mut it = item("t1", "Task");
        it.metadata.priority = Some("high".to_string());
        assert_eq!(Document::from_item(&it, None).unwrap().priority, "high");

        it.metadata.priority = None;
        assert_eq!(Document::from_item(&it, None).unwrap().priority, "medium");

        it.metadata.priority = Some("  ".to_string());
        assert_eq!(Document::from_item(&it, None).unwrap().priority, "medium");
    }

    #[test]
    fn test_malformed_records_rejected() {
        assert!(Document::from_project(&project("", "Name", "")).is_none());
        assert!(Document::from_project(&project("p1", "  ", "")).is_none());
        assert!(Document::from_item(&item("", "Title"), None).is_none());
        assert!(Document::from_item(&item("t1", ""), None).is_none());
    }

    #[test]
    fn test_rebuilding_unchanged_record_is_identical() {
        let p = project("p1", "Website Revamp", "redo the homepage");
        let a = Document::from_project(&p).unwrap();
        let b = Document::from_project(&p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tokens, b.tokens);
    }
}
