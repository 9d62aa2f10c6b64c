/// Keyword search over the catalog.
///
/// Every whitespace-separated term must appear somewhere in an entry's haystack (slug, title,
/// category, summary, reference titles and URLs). Results are unranked and keep dataset
/// order; an empty query matches everything subject to the category filter.
use crate::index::CatalogIndex;
use crate::model::ApiEntry;
use crate::text::normalize_key;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 25;

pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}

/// Lowercase searchable text for one entry.
pub fn haystack(api: &ApiEntry) -> String {
    let references = api
        .references
        .iter()
        .map(|r| format!("{} {}", r.title, r.url))
        .collect::<Vec<_>>()
        .join(" ");
    [
        api.slug.as_str(),
        api.title.as_str(),
        api.category.as_str(),
        api.summary.as_str(),
        references.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

impl CatalogIndex {
    /// Entries matching all terms of `query`, optionally restricted to one category.
    /// `limit` is clamped to `1..=MAX_LIMIT`.
    pub fn search(&self, query: &str, category_id: Option<&str>, limit: usize) -> Vec<&ApiEntry> {
        let query = normalize_key(query);
        let terms: Vec<&str> = query.split_whitespace().collect();
        let category = category_id.map(normalize_key).filter(|c| !c.is_empty());

        self.searchable()
            .filter(|(_, _, key)| category.as_deref().is_none_or(|c| c == *key))
            .filter(|(_, haystack, _)| terms.iter().all(|term| haystack.contains(term)))
            .map(|(api, _, _)| api)
            .take(clamp_limit(limit))
            .collect()
    }
}
