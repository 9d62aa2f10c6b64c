/// `moodleapi://` resource addressing.
///
/// - `moodleapi://catalog`: every category with its slugs
/// - `moodleapi://api/{slug}`: one entry, as JSON plus a Markdown rendering
/// - `moodleapi://category/{categoryId}`: one category with its entries
use crate::text::normalize_key;

pub const CATALOG_URI: &str = "moodleapi://catalog";
pub const API_TEMPLATE: &str = "moodleapi://api/{slug}";
pub const CATEGORY_TEMPLATE: &str = "moodleapi://category/{categoryId}";

pub const API_ARGUMENT: &str = "slug";
pub const CATEGORY_ARGUMENT: &str = "categoryId";

const API_PREFIX: &str = "moodleapi://api/";
const CATEGORY_PREFIX: &str = "moodleapi://category/";

/// Completion caps per template argument.
pub const API_COMPLETION_LIMIT: usize = 15;
pub const CATEGORY_COMPLETION_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTarget<'a> {
    Catalog,
    Api(&'a str),
    Category(&'a str),
}

pub fn api_uri(slug: &str) -> String {
    format!("{API_PREFIX}{slug}")
}

pub fn category_uri(category_id: &str) -> String {
    format!("{CATEGORY_PREFIX}{category_id}")
}

/// Classify a resource URI. A `#fragment` suffix is ignored; an empty variable is no match.
pub fn parse_uri(uri: &str) -> Option<ResourceTarget<'_>> {
    let uri = uri.split_once('#').map_or(uri, |(base, _)| base).trim();
    if uri == CATALOG_URI {
        return Some(ResourceTarget::Catalog);
    }
    if let Some(slug) = uri.strip_prefix(API_PREFIX).filter(|s| !s.is_empty()) {
        return Some(ResourceTarget::Api(slug));
    }
    uri.strip_prefix(CATEGORY_PREFIX)
        .filter(|id| !id.is_empty())
        .map(ResourceTarget::Category)
}

/// Candidates that start with the normalized `prefix`, in their original order.
pub fn complete_prefix<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    prefix: &str,
    limit: usize,
) -> Vec<String> {
    let prefix = normalize_key(prefix);
    candidates
        .into_iter()
        .filter(|candidate| candidate.starts_with(&prefix))
        .take(limit)
        .map(str::to_string)
        .collect()
}
