//! Public search interface types.
//!
//! Filters, options, results, facets, statistics, and the top-level
//! error type. These are the shapes the embedding application sees; the
//! engine internals live in `query`, `suggest`, and `service`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Document;
use crate::record_store::StoreError;

// ═══════════════════════════════════════════════════════════════════════════════
// FILTERS & OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Inclusive date range applied to a document's `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Structured filters, AND-combined. An empty list for a facet means no
/// constraint on that facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub date_range: Option<DateRange>,
    /// Passes if ANY filter tag is a case-insensitive substring of ANY
    /// document tag.
    pub tags: Vec<String>,
    /// Exact membership.
    pub status: Vec<String>,
    /// Exact membership.
    pub priority: Vec<String>,
    /// Excludes non-matching item documents; never excludes projects.
    pub project_id: Option<String>,
}

/// Search behavior switches. `Default` gives the standard search: all
/// types included, case-insensitive substring matching, up to 100
/// results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub include_projects: bool,
    pub include_tasks: bool,
    pub include_notes: bool,
    /// Also controls "idea" documents, which group with snippets.
    pub include_snippets: bool,
    pub case_sensitive: bool,
    /// Match terms only at word boundaries.
    pub whole_words: bool,
    /// Treat the whole query as one regular expression. An invalid
    /// pattern falls back to plain substring matching.
    pub use_regex: bool,
    /// Whether body text contributes to scoring.
    pub search_in_content: bool,
    /// Whether tags contribute to scoring.
    pub search_in_tags: bool,
    /// Cap on ranked results before grouping.
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            include_projects: true,
            include_tasks: true,
            include_notes: true,
            include_snippets: true,
            case_sensitive: false,
            whole_words: false,
            use_regex: false,
            search_in_content: true,
            search_in_tags: true,
            max_results: 100,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Which field a highlight was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightField {
    Title,
    Content,
}

/// A matched term within a display field. Content highlights carry at
/// most the first 200 characters of the body, with a "..." suffix when
/// truncated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub field: HighlightField,
    pub text: String,
    pub term: String,
}

/// One ranked result: the scored document plus its highlights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: f64,
    pub highlights: Vec<Highlight>,
    pub document: Document,
}

/// Grouped, ranked search results. `total` counts every scoring match
/// before the `max_results` cut, so group sizes can undercount relative
/// to it when truncation occurs (see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub projects: Vec<SearchHit>,
    pub tasks: Vec<SearchHit>,
    pub notes: Vec<SearchHit>,
    /// Snippet and idea documents.
    pub snippets: Vec<SearchHit>,
    pub total: usize,
}

impl SearchResult {
    /// The canonical empty result: all groups empty, total 0.
    pub fn empty() -> Self {
        SearchResult::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FACETS & STATS
// ═══════════════════════════════════════════════════════════════════════════════

/// A project available as a filter target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFacet {
    pub id: String,
    pub name: String,
}

/// Distinct filterable values derived from the current index. Each list
/// is sorted ascending; projects sort by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub tags: Vec<String>,
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub projects: Vec<ProjectFacet>,
    pub types: Vec<String>,
}

/// Index composition counters for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_items: usize,
    pub projects: usize,
    pub tasks: usize,
    pub notes: usize,
    /// Snippet and idea documents.
    pub snippets: usize,
    pub last_update: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Error type for search operations. A record-store failure during a
/// rebuild surfaces here; the previously built index stays queryable.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("record store error: {0}")]
    Store(#[from] StoreError),
}
