//! Search service facade.
//!
//! [`SearchService`] owns the in-memory index and exposes the full search
//! surface: rebuilds, incremental updates, queries, suggestions, facets,
//! statistics, and the bounded search history. The record store is
//! injected at construction, so the service works identically over files,
//! a database adapter, or in-memory fixtures.
//!
//! Rebuilds are build-aside-and-swap: a replacement index is assembled
//! off to the side and installed only once every load has succeeded, so a
//! failing record store never leaves a half-built index behind.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Duration;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::document::{DocType, Document};
use crate::index::{IndexStore, MemoryIndex};
use crate::interface::{Facets, IndexStats, SearchError, SearchFilters, SearchOptions, SearchResult};
use crate::models::{Item, Project};
use crate::query::run_search;
use crate::record_store::RecordStore;
use crate::suggest::{self, DEFAULT_SUGGESTION_LIMIT};

/// Tuning knobs for [`SearchService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// A search triggers a rebuild when the index is older than this.
    pub staleness_threshold: Duration,
    /// Maximum retained history entries.
    pub history_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            staleness_threshold: Duration::seconds(30),
            history_capacity: 20,
        }
    }
}

/// The search engine facade.
pub struct SearchService {
    store: Arc<dyn RecordStore>,
    index: RwLock<MemoryIndex>,
    history: Mutex<VecDeque<String>>,
    config: ServiceConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: Arc<dyn RecordStore>, config: ServiceConfig) -> Self {
        SearchService {
            store,
            index: RwLock::new(MemoryIndex::new()),
            history: Mutex::new(VecDeque::new()),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Index lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Rebuild the index from the record store. On any load failure the
    /// error propagates and the previously built index stays in place.
    pub async fn rebuild_index(&self) -> Result<(), SearchError> {
        let mut fresh = MemoryIndex::new();

        let projects = self.store.load_all_projects().await?;
        for project in &projects {
            match Document::from_project(project) {
                Some(doc) => fresh.upsert(doc),
                None => debug!(id = %project.id, "skipping malformed project record"),
            }
        }
        for project in &projects {
            let items = self.store.load_items(&project.id).await?;
            for item in &items {
                match Document::from_item(item, Some(project)) {
                    Some(doc) => fresh.upsert(doc),
                    None => debug!(id = %item.id, "skipping malformed item record"),
                }
            }
        }

        fresh.mark_rebuilt();
        let indexed = fresh.len();
        *self.index.write() = fresh;
        info!(documents = indexed, "search index rebuilt");
        Ok(())
    }

    /// Index or re-index a single project. Errors never surface from
    /// incremental updates; a malformed record is logged and skipped.
    pub fn index_project(&self, project: &Project) {
        match Document::from_project(project) {
            Some(doc) => self.index.write().upsert(doc),
            None => warn!(id = %project.id, "not indexing malformed project record"),
        }
    }

    /// Index or re-index a single item, resolving its owning project
    /// through the record store. A store failure or missing project is
    /// logged and the item indexed with the placeholder project name.
    pub async fn index_item(&self, item: &Item) {
        let owner = match self.store.load_project(&item.project_id).await {
            Ok(owner) => owner,
            Err(err) => {
                warn!(item = %item.id, error = %err, "project lookup failed during incremental index");
                None
            }
        };
        match Document::from_item(item, owner.as_ref()) {
            Some(doc) => self.index.write().upsert(doc),
            None => warn!(id = %item.id, "not indexing malformed item record"),
        }
    }

    /// Remove a document by id. Removing an unknown id is a no-op.
    pub fn remove_from_index(&self, id: &str) {
        self.index.write().remove(id);
    }

    /// Index composition counters.
    pub fn get_index_stats(&self) -> IndexStats {
        let index = self.index.read();
        let mut stats = IndexStats {
            total_items: index.len(),
            last_update: index.last_rebuild(),
            ..IndexStats::default()
        };
        for doc in index.iter() {
            match doc.doc_type {
                DocType::Project => stats.projects += 1,
                DocType::Task => stats.tasks += 1,
                DocType::Note => stats.notes += 1,
                DocType::Snippet | DocType::Idea => stats.snippets += 1,
            }
        }
        stats
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Run a search. A blank query returns the canonical empty result
    /// without touching the index or its freshness. Otherwise a stale
    /// index is rebuilt first; a rebuild failure propagates and the old
    /// index is left queryable for later calls.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        options: &SearchOptions,
    ) -> Result<SearchResult, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(SearchResult::empty());
        }

        self.ensure_fresh().await?;

        let result = {
            let index = self.index.read();
            run_search(&*index, trimmed, filters, options)
        };
        self.record_history(trimmed);
        Ok(result)
    }

    /// Autocomplete candidates from indexed titles and tags. `limit`
    /// defaults to 5.
    pub fn get_suggestions(&self, query: &str, limit: Option<usize>) -> Vec<String> {
        let index = self.index.read();
        suggest::suggestions(&*index, query, limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT))
    }

    /// Distinct filterable values in the current index.
    pub fn get_facets(&self) -> Facets {
        suggest::facets(&*self.index.read())
    }

    async fn ensure_fresh(&self) -> Result<(), SearchError> {
        let stale = {
            let index = self.index.read();
            match index.last_rebuild() {
                Some(at) => chrono::Utc::now() - at > self.config.staleness_threshold,
                None => true,
            }
        };
        if stale {
            self.rebuild_index().await?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────

    /// Executed queries, most recent first.
    pub fn search_history(&self) -> Vec<String> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Record a query: re-running one moves it to the front, and the
    /// list is capped at the configured capacity.
    fn record_history(&self, query: &str) {
        let mut history = self.history.lock();
        history.retain(|entry| entry != query);
        history.push_front(query.to_string());
        history.truncate(self.config.history_capacity);
    }
}
