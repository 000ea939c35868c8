//! worklens - embedded search for project workspaces
//!
//! This library implements the search core of a project-management
//! workspace: projects and their items (tasks, notes, snippets, ideas)
//! are flattened into an in-memory index and queried with scored
//! substring, whole-word, or regex matching.
//!
//! # Architecture
//! - `models`: Source record shapes (Project, Item) as stored on disk
//! - `tokenizer`: Text normalization and stop-word filtering
//! - `document`: Indexed document built from a source record
//! - `index`: The in-memory index store
//! - `query`: Scan-and-score query engine
//! - `suggest`: Autocomplete suggestions and filter facets
//! - `record_store`: Async seam to the application's persistence
//! - `service`: [`SearchService`], the public facade

mod document;
mod index;
mod interface;
mod models;
mod query;
mod record_store;
mod service;
mod suggest;
mod tokenizer;

pub use document::{DocType, Document, SourceRecord, DEFAULT_PRIORITY, UNKNOWN_PROJECT};
pub use index::{IndexStore, MemoryIndex};
pub use interface::{
    DateRange, Facets, Highlight, HighlightField, IndexStats, ProjectFacet, SearchError,
    SearchFilters, SearchHit, SearchOptions, SearchResult,
};
pub use models::{parse_timestamp, Item, ItemKind, Metadata, Project};
pub use record_store::{JsonRecordStore, RecordStore, StaticRecordStore, StoreError};
pub use service::{SearchService, ServiceConfig};
pub use tokenizer::{tokenize, STOP_WORDS};
