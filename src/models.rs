//! Domain records as stored by the application.
//!
//! Projects own items; an item is a task, note, snippet, or idea,
//! distinguished by its `type` field in the stored JSON. The search core
//! never mutates these records; it reads them from a [`RecordStore`]
//! (see `record_store`) and derives indexable documents from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags and priority carried by both projects and items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// A project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// The kind of a stored item. A missing `type` field defaults to `Task`
/// via the container default, and an unrecognized value falls back to
/// `Task` as well rather than failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Note,
    Snippet,
    Idea,
    #[serde(other)]
    Task,
}

impl Default for ItemKind {
    fn default() -> Self {
        ItemKind::Task
    }
}

/// A stored item: task, note, snippet, or idea. One shape for all four;
/// `kind` is the discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Parse an RFC 3339 timestamp as stored in the record files.
/// Returns `None` for empty or malformed strings; callers treat such
/// records as having no usable timestamp rather than failing.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
