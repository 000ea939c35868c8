//! Query engine: scan, filter, score, rank, group.
//!
//! Search is a single pass over the index. Every document is checked
//! against the type-inclusion flags and the structured filters, then
//! scored per query term; anything scoring zero is dropped. Survivors
//! are sorted by score (ties broken by id for a deterministic order),
//! truncated to `max_results`, and partitioned into per-type groups.
//! `total` counts matches before truncation (see DESIGN.md).

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::document::{DocType, Document};
use crate::index::IndexStore;
use crate::interface::{
    Highlight, HighlightField, SearchFilters, SearchHit, SearchOptions, SearchResult,
};
use crate::tokenizer::tokenize_preserving_case;

/// Scoring weights, summed per query term.
const TITLE_WEIGHT: f64 = 10.0;
const CONTENT_WEIGHT: f64 = 5.0;
/// Applied once per matching tag, not once per document.
const TAG_WEIGHT: f64 = 8.0;
const TOKEN_WEIGHT: f64 = 1.0;

/// Multiplier for documents updated within the last 7 days.
const RECENCY_BOOST: f64 = 1.2;
const RECENCY_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

/// Content highlights carry at most this many characters of body text.
pub(crate) const CONTENT_HIGHLIGHT_CHARS: usize = 200;

/// How a single query term matches document text.
enum TermMatcher {
    /// Plain containment. The needle is already case-normalized; the
    /// haystack is lowercased at match time unless the search is
    /// case-sensitive.
    Substring(String),
    /// Compiled pattern: whole-word anchors or a user regex, with case
    /// sensitivity baked in at build time.
    Pattern(Regex),
}

/// One parsed query term: the raw text (reported in highlights and used
/// for verbatim token lookups) plus its matcher.
struct QueryTerm {
    raw: String,
    matcher: TermMatcher,
}

impl QueryTerm {
    fn build(raw: String, options: &SearchOptions) -> QueryTerm {
        let matcher = if options.use_regex {
            match RegexBuilder::new(&raw)
                .case_insensitive(!options.case_sensitive)
                .build()
            {
                Ok(re) => TermMatcher::Pattern(re),
                Err(err) => {
                    // Invalid user pattern: degrade to substring matching
                    // rather than failing the whole search.
                    debug!(pattern = %raw, error = %err, "invalid regex query, falling back to substring");
                    TermMatcher::Substring(raw.clone())
                }
            }
        } else if options.whole_words {
            let anchored = format!(r"\b{}\b", regex::escape(&raw));
            match RegexBuilder::new(&anchored)
                .case_insensitive(!options.case_sensitive)
                .build()
            {
                Ok(re) => TermMatcher::Pattern(re),
                Err(_) => TermMatcher::Substring(raw.clone()),
            }
        } else {
            TermMatcher::Substring(raw.clone())
        };
        QueryTerm { raw, matcher }
    }

    fn is_match(&self, text: &str, case_sensitive: bool) -> bool {
        match &self.matcher {
            TermMatcher::Substring(needle) => {
                if case_sensitive {
                    text.contains(needle)
                } else {
                    text.to_lowercase().contains(needle)
                }
            }
            TermMatcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// Parse the normalized query into matchable terms. Regex mode treats
/// the whole query as one term; otherwise the query is tokenized like
/// document text. The query was already lowercased during normalization
/// unless the search is case-sensitive, so casing is preserved here.
fn build_query_terms(normalized: &str, options: &SearchOptions) -> Vec<QueryTerm> {
    if options.use_regex {
        vec![QueryTerm::build(normalized.to_string(), options)]
    } else {
        tokenize_preserving_case(normalized)
            .into_iter()
            .map(|token| QueryTerm::build(token, options))
            .collect()
    }
}

/// Run a search over the index. The query must be non-empty (the service
/// short-circuits blank queries before reaching here).
pub(crate) fn run_search(
    index: &dyn IndexStore,
    query: &str,
    filters: &SearchFilters,
    options: &SearchOptions,
) -> SearchResult {
    let normalized = if options.case_sensitive {
        query.trim().to_string()
    } else {
        query.trim().to_lowercase()
    };
    let terms = build_query_terms(&normalized, options);
    if terms.is_empty() {
        return SearchResult::empty();
    }

    let mut hits: Vec<SearchHit> = Vec::new();
    for doc in index.iter() {
        if !type_included(doc.doc_type, options) {
            continue;
        }
        if !passes_filters(doc, filters) {
            continue;
        }
        let (score, highlights) = score_document(doc, &terms, options);
        if score > 0.0 {
            hits.push(SearchHit {
                score,
                highlights,
                document: doc.clone(),
            });
        }
    }

    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.document.id.cmp(&b.document.id))
    });

    let total = hits.len();
    hits.truncate(options.max_results);

    let mut result = SearchResult {
        total,
        ..SearchResult::default()
    };
    for hit in hits {
        match hit.document.doc_type {
            DocType::Project => result.projects.push(hit),
            DocType::Task => result.tasks.push(hit),
            DocType::Note => result.notes.push(hit),
            DocType::Snippet | DocType::Idea => result.snippets.push(hit),
        }
    }
    result
}

fn type_included(doc_type: DocType, options: &SearchOptions) -> bool {
    match doc_type {
        DocType::Project => options.include_projects,
        DocType::Task => options.include_tasks,
        DocType::Note => options.include_notes,
        DocType::Snippet | DocType::Idea => options.include_snippets,
    }
}

/// All filters are AND-combined; failing any one excludes the document.
fn passes_filters(doc: &Document, filters: &SearchFilters) -> bool {
    if let Some(range) = &filters.date_range {
        if range.start.is_some() || range.end.is_some() {
            match doc.updated_at_utc() {
                Some(updated) => {
                    if let Some(start) = range.start {
                        if updated < start {
                            return false;
                        }
                    }
                    if let Some(end) = range.end {
                        if updated > end {
                            return false;
                        }
                    }
                }
                // No usable timestamp: fails any bounded range.
                None => return false,
            }
        }
    }

    if !filters.tags.is_empty() {
        let any_tag_matches = filters.tags.iter().any(|filter_tag| {
            let filter_tag = filter_tag.to_lowercase();
            doc.tags
                .iter()
                .any(|doc_tag| doc_tag.to_lowercase().contains(&filter_tag))
        });
        if !any_tag_matches {
            return false;
        }
    }

    if !filters.status.is_empty() && !filters.status.iter().any(|s| *s == doc.status) {
        return false;
    }

    if !filters.priority.is_empty() && !filters.priority.iter().any(|p| *p == doc.priority) {
        return false;
    }

    if let Some(project_id) = &filters.project_id {
        // Projects are never excluded by this rule; items must belong.
        if doc.doc_type != DocType::Project && doc.project_id.as_deref() != Some(project_id) {
            return false;
        }
    }

    true
}

/// Score one document against the parsed query terms and collect its
/// highlights. Returns 0.0 when nothing matches.
fn score_document(
    doc: &Document,
    terms: &[QueryTerm],
    options: &SearchOptions,
) -> (f64, Vec<Highlight>) {
    let cs = options.case_sensitive;
    let mut score = 0.0;
    let mut highlights = Vec::new();

    // Highlight snippet: first 200 chars of content, computed once.
    let content_head: String = doc.content.chars().take(CONTENT_HIGHLIGHT_CHARS).collect();
    let content_truncated = doc.content.chars().count() > CONTENT_HIGHLIGHT_CHARS;

    for term in terms {
        if term.is_match(&doc.title, cs) {
            score += TITLE_WEIGHT;
            highlights.push(Highlight {
                field: HighlightField::Title,
                text: doc.title.clone(),
                term: term.raw.clone(),
            });
        }

        if options.search_in_content && !doc.content.is_empty() && term.is_match(&doc.content, cs)
        {
            score += CONTENT_WEIGHT;
        }

        if options.search_in_tags {
            for tag in &doc.tags {
                if term.is_match(tag, cs) {
                    score += TAG_WEIGHT;
                }
            }
        }

        if doc.tokens.iter().any(|token| *token == term.raw) {
            score += TOKEN_WEIGHT;
        }

        if !content_head.is_empty() && term.is_match(&content_head, cs) {
            let text = if content_truncated {
                format!("{content_head}...")
            } else {
                content_head.clone()
            };
            highlights.push(Highlight {
                field: HighlightField::Content,
                text,
                term: term.raw.clone(),
            });
        }
    }

    if score > 0.0 {
        if is_recent(doc) {
            score *= RECENCY_BOOST;
        }
        score *= priority_weight(&doc.priority);
    }

    (score, highlights)
}

/// Updated within the recency window. A missing or malformed timestamp
/// never boosts.
fn is_recent(doc: &Document) -> bool {
    match doc.updated_at_utc() {
        Some(updated) => {
            chrono::Utc::now().signed_duration_since(updated).num_seconds() < RECENCY_WINDOW_SECS
        }
        None => false,
    }
}

fn priority_weight(priority: &str) -> f64 {
    match priority {
        "high" => 1.3,
        "low" => 0.8,
        // "medium" and anything unrecognized (including "urgent").
        _ => 1.0,
    }
}
