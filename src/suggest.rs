//! Autocomplete suggestions and filter facets.
//!
//! Both are derived from the live index on demand. Suggestions are a
//! bounded scan over titles and tags; facets enumerate the distinct
//! filterable values so the UI can offer them without a second data
//! source.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::document::DocType;
use crate::index::IndexStore;
use crate::interface::{Facets, ProjectFacet};

/// Suggestions returned when the caller does not ask for a count.
pub(crate) const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Queries shorter than this yield no suggestions.
const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Collect up to `limit` distinct titles and tags containing the query,
/// case-insensitively. The scan stops as soon as the limit is reached.
pub(crate) fn suggestions(index: &dyn IndexStore, query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_SUGGESTION_QUERY_CHARS || limit == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();

    let mut push = |candidate: &str, out: &mut Vec<String>, seen: &mut HashSet<String>| {
        let lower = candidate.to_lowercase();
        if lower.contains(&needle) && seen.insert(lower) {
            out.push(candidate.to_string());
        }
    };

    for doc in index.iter() {
        push(&doc.title, &mut out, &mut seen);
        if out.len() >= limit {
            break;
        }
        for tag in &doc.tags {
            push(tag, &mut out, &mut seen);
            if out.len() >= limit {
                break;
            }
        }
        if out.len() >= limit {
            break;
        }
    }

    out
}

/// Enumerate the distinct filterable values in the index. Tags, statuses,
/// priorities, and type names come back sorted; projects sort by name.
pub(crate) fn facets(index: &dyn IndexStore) -> Facets {
    let mut tags: BTreeSet<String> = BTreeSet::new();
    let mut status: BTreeSet<String> = BTreeSet::new();
    let mut priority: BTreeSet<String> = BTreeSet::new();
    let mut types: BTreeSet<&'static str> = BTreeSet::new();
    // id → name; a BTreeMap keeps one entry per project id.
    let mut projects: BTreeMap<String, String> = BTreeMap::new();

    for doc in index.iter() {
        tags.extend(doc.tags.iter().cloned());
        if !doc.status.is_empty() {
            status.insert(doc.status.clone());
        }
        if !doc.priority.is_empty() {
            priority.insert(doc.priority.clone());
        }
        types.insert(doc.doc_type.as_str());
        if doc.doc_type == DocType::Project {
            projects.insert(doc.id.clone(), doc.title.clone());
        }
    }

    let mut project_facets: Vec<ProjectFacet> = projects
        .into_iter()
        .map(|(id, name)| ProjectFacet { id, name })
        .collect();
    project_facets.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Facets {
        tags: tags.into_iter().collect(),
        status: status.into_iter().collect(),
        priority: priority.into_iter().collect(),
        projects: project_facets,
        types: types.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::MemoryIndex;
    use crate::models::{Item, ItemKind, Metadata, Project};

    fn project(id: &str, name: &str, tags: &[&str]) -> Document {
        Document::from_project(&Project {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            status: "active".to_string(),
            metadata: Metadata {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                priority: None,
            },
            created_at: String::new(),
            updated_at: String::new(),
        })
        .unwrap()
    }

    fn task(id: &str, title: &str, tags: &[&str], priority: Option<&str>) -> Document {
        Document::from_item(
            &Item {
                id: id.to_string(),
                project_id: "p1".to_string(),
                title: title.to_string(),
                content: String::new(),
                kind: ItemKind::Task,
                status: "todo".to_string(),
                metadata: Metadata {
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    priority: priority.map(str::to_string),
                },
                created_at: String::new(),
                updated_at: String::new(),
            },
            None,
        )
        .unwrap()
    }

    fn sample_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.upsert(project("p1", "Website Revamp", &["web"]));
        index.upsert(project("p2", "API Gateway", &["backend"]));
        index.upsert(task("t1", "Fix web login", &["web", "bug"], Some("high")));
        index.upsert(task("t2", "Write weekly report", &[], None));
        index
    }

    #[test]
    fn test_suggestions_match_titles_and_tags() {
        let index = sample_index();
        let got = suggestions(&index, "web", 10);
        assert!(got.contains(&"Website Revamp".to_string()));
        assert!(got.contains(&"web".to_string()));
        assert!(got.contains(&"Fix web login".to_string()));
    }

    #[test]
    fn test_suggestions_case_insensitive_and_deduplicated() {
        let index = sample_index();
        let got = suggestions(&index, "WEB", 10);
        // "web" appears as a tag on two documents but suggests once.
        assert_eq!(got.iter().filter(|s| s.as_str() == "web").count(), 1);
        assert!(!got.is_empty());
    }

    #[test]
    fn test_suggestions_require_two_chars() {
        let index = sample_index();
        assert!(suggestions(&index, "w", 10).is_empty());
        assert!(suggestions(&index, "  ", 10).is_empty());
        assert!(!suggestions(&index, "we", 10).is_empty());
    }

    #[test]
    fn test_suggestions_stop_at_limit() {
        let index = sample_index();
        let got = suggestions(&index, "we", 2);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_facets_are_sorted_and_distinct() {
        let index = sample_index();
        let facets = facets(&index);
        assert_eq!(facets.tags, vec!["backend", "bug", "web"]);
        assert_eq!(facets.status, vec!["active", "todo"]);
        // Missing priority fell back to "medium" at indexing time.
        assert_eq!(facets.priority, vec!["high", "medium"]);
        assert_eq!(facets.types, vec!["project", "task"]);
    }

    #[test]
    fn test_facets_project_map_sorted_by_name() {
        let index = sample_index();
        let facets = facets(&index);
        let names: Vec<&str> = facets.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["API Gateway", "Website Revamp"]);
        assert_eq!(facets.projects[0].id, "p2");
    }

    #[test]
    fn test_empty_index_yields_empty_facets() {
        let index = MemoryIndex::new();
        assert_eq!(facets(&index), Facets::default());
        assert!(suggestions(&index, "web", 5).is_empty());
    }
}
