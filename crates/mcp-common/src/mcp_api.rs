use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LookupApiParams {
    /// Slug, anchor ID, or title of the API entry. Fragments fall back to a partial match.
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchApisParams {
    /// Space-separated keywords; every keyword must appear in a matching entry.
    pub query: Option<String>,
    /// Restrict results to a single category ID such as "core-apis".
    pub category_id: Option<String>,
    /// Maximum number of results to return (default: 10, range: 1-25).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCategoryParams {
    /// Category ID as listed by `list_categories`.
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceInfo {
    pub title: String,
    pub url: String,
}

/// A full API entry together with the provenance of the dataset it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetail {
    pub title: String,
    pub slug: String,
    pub anchor_id: String,
    pub category: String,
    pub category_id: String,
    pub summary: String,
    pub references: Vec<ReferenceInfo>,
    pub source: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupApiResponse {
    pub api: ApiDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResult {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub category_id: String,
    pub summary: String,
    pub reference_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchApisResponse {
    pub results: Vec<ApiSearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub id: String,
    pub title: String,
    pub entry_count: usize,
    pub slugs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListResponse {
    pub source: String,
    pub generated_at: String,
    pub total_apis: usize,
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiSummary {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub references: Vec<ReferenceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailResponse {
    pub id: String,
    pub title: String,
    pub entry_count: usize,
    pub apis: Vec<ApiSummary>,
    pub source: String,
    pub generated_at: String,
}
