//! Record store seam.
//!
//! The search core never owns persistence: it reads projects and items
//! through [`RecordStore`] and rebuilds the index from whatever the store
//! returns. [`JsonRecordStore`] matches the application's on-disk layout
//! (`projects.json` plus `items/<project_id>.json`); [`StaticRecordStore`]
//! serves embedders and tests that already hold records in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::{Item, Project};

/// Error type for record reads.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error reading records: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record file {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asynchronous source of domain records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All projects. A failure here aborts an in-progress rebuild.
    async fn load_all_projects(&self) -> Result<Vec<Project>, StoreError>;

    /// All items (tasks, notes, snippets, ideas) belonging to a project.
    async fn load_items(&self, project_id: &str) -> Result<Vec<Item>, StoreError>;

    /// Single project lookup, used when incrementally indexing one item
    /// without its full project already in hand.
    async fn load_project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file store
// ─────────────────────────────────────────────────────────────────────────────

/// File-backed record store: `<root>/projects.json` holds all projects,
/// `<root>/items/<project_id>.json` holds each project's items. Missing
/// files read as empty lists. A file that is not a JSON array at all is
/// an error; individual records inside it that fail to decode are logged
/// and skipped, so one bad record never poisons the rest of the file.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    root: PathBuf,
}

impl JsonRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn projects_path(&self) -> PathBuf {
        self.root.join("projects.json")
    }

    fn items_path(&self, project_id: &str) -> PathBuf {
        self.root.join("items").join(format!("{project_id}.json"))
    }

    async fn read_list<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let raw: Vec<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: path.display().to_string(),
                source,
            })?;

        // Records are decoded one at a time so a single malformed entry
        // degrades recall for that entry only.
        let mut records = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value(value) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping malformed record");
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn load_all_projects(&self) -> Result<Vec<Project>, StoreError> {
        Self::read_list(&self.projects_path()).await
    }

    async fn load_items(&self, project_id: &str) -> Result<Vec<Item>, StoreError> {
        Self::read_list(&self.items_path(project_id)).await
    }

    async fn load_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        let projects = self.load_all_projects().await?;
        Ok(projects.into_iter().find(|p| p.id == project_id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory record store for embedders and tests that already hold the
/// records.
#[derive(Debug, Clone, Default)]
pub struct StaticRecordStore {
    projects: Vec<Project>,
    items: HashMap<String, Vec<Item>>,
}

impl StaticRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project along with its items.
    pub fn with_project(mut self, project: Project, items: Vec<Item>) -> Self {
        self.items.insert(project.id.clone(), items);
        self.projects.push(project);
        self
    }
}

#[async_trait]
impl RecordStore for StaticRecordStore {
    async fn load_all_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.clone())
    }

    async fn load_items(&self, project_id: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.get(project_id).cloned().unwrap_or_default())
    }

    async fn load_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.iter().find(|p| p.id == project_id).cloned())
    }
}
