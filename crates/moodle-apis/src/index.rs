/// In-memory catalog index, built once per process from a validated dataset.
///
/// Lookup structures:
/// - `by_slug`: normalized slug → entry
/// - `by_alias`: normalized slug, anchor ID and title → entry. An earlier entry's claim on a
///   key is never overwritten by a later one, so colliding aliases resolve to the first
///   entry in dataset order rather than the most specific match.
/// - categories: normalized category ID → entries, in first-seen order
///
/// The index has no mutation methods; share it behind an `Arc` across readers.
use std::collections::HashMap;

use crate::dataset::{self, Diagnostic};
use crate::model::{ApiEntry, Dataset};
use crate::text::normalize_key;

#[derive(Debug)]
pub struct CatalogIndex {
    source: String,
    generated_at: String,
    apis: Vec<ApiEntry>,
    haystacks: Vec<String>,
    category_keys: Vec<String>,
    by_slug: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    categories: Vec<CategoryGroup>,
    category_positions: HashMap<String, usize>,
}

#[derive(Debug)]
struct CategoryGroup {
    id: String,
    title: String,
    members: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntries<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub entries: Vec<&'a ApiEntry>,
}

impl CatalogIndex {
    /// Index `dataset`. A declared count that disagrees with the entry list is reported as a
    /// diagnostic; the entry list is authoritative.
    pub fn build(dataset: Dataset) -> (Self, Vec<Diagnostic>) {
        let diagnostics: Vec<Diagnostic> = dataset::count_diagnostic(&dataset).into_iter().collect();

        let mut by_slug = HashMap::new();
        let mut by_alias = HashMap::new();
        let mut categories: Vec<CategoryGroup> = Vec::new();
        let mut category_positions: HashMap<String, usize> = HashMap::new();
        let mut haystacks = Vec::with_capacity(dataset.apis.len());
        let mut category_keys = Vec::with_capacity(dataset.apis.len());

        for (i, api) in dataset.apis.iter().enumerate() {
            let slug_key = normalize_key(&api.slug);
            by_slug.entry(slug_key.clone()).or_insert(i);

            for key in [slug_key, normalize_key(&api.anchor_id), normalize_key(&api.title)] {
                if !key.is_empty() {
                    by_alias.entry(key).or_insert(i);
                }
            }

            let category_key = api.category_key();
            let position = *category_positions
                .entry(category_key.clone())
                .or_insert_with(|| {
                    categories.push(CategoryGroup {
                        id: category_key.clone(),
                        title: api.category.clone(),
                        members: Vec::new(),
                    });
                    categories.len() - 1
                });
            categories[position].members.push(i);

            haystacks.push(crate::search::haystack(api));
            category_keys.push(category_key);
        }

        let index = Self {
            source: dataset.source,
            generated_at: dataset.generated_at,
            apis: dataset.apis,
            haystacks,
            category_keys,
            by_slug,
            by_alias,
            categories,
            category_positions,
        };
        (index, diagnostics)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// All entries in dataset order.
    pub fn entries(&self) -> &[ApiEntry] {
        &self.apis
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Exact slug lookup (case-insensitive). See [`CatalogIndex::resolve`] for alias and partial
    /// matching.
    pub fn get(&self, slug: &str) -> Option<&ApiEntry> {
        self.by_slug.get(&normalize_key(slug)).map(|&i| &self.apis[i])
    }

    pub(crate) fn alias(&self, key: &str) -> Option<&ApiEntry> {
        self.by_alias.get(key).map(|&i| &self.apis[i])
    }

    /// Entries paired with their lowercase search text and normalized category key.
    pub(crate) fn searchable(&self) -> impl Iterator<Item = (&ApiEntry, &str, &str)> {
        self.apis
            .iter()
            .zip(&self.haystacks)
            .zip(&self.category_keys)
            .map(|((api, haystack), key)| (api, haystack.as_str(), key.as_str()))
    }

    pub fn list_categories(&self) -> Vec<CategorySummary<'_>> {
        self.categories
            .iter()
            .map(|c| CategorySummary {
                id: &c.id,
                title: &c.title,
                entry_count: c.members.len(),
            })
            .collect()
    }

    pub fn get_category(&self, category_id: &str) -> Option<CategoryEntries<'_>> {
        let position = *self.category_positions.get(&normalize_key(category_id))?;
        let group = &self.categories[position];
        Some(CategoryEntries {
            id: &group.id,
            title: &group.title,
            entries: group.members.iter().map(|&i| &self.apis[i]).collect(),
        })
    }
}
