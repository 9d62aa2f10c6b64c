use serde::{Deserialize, Serialize};

use mcp_common::mcp_api::{ApiDetail, ApiSearchResult, ApiSummary, ReferenceInfo};

/// An outbound documentation link. Two references are the same link when their URLs match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Link text, or the resolved URL when the link had no text
    pub title: String,
    /// Absolute URL
    pub url: String,
}

/// One documented Moodle API (a level-3 heading on the documentation page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEntry {
    /// Heading text, whitespace-normalized
    pub title: String,
    /// Unique URL-safe identifier, e.g. "cache" or "access-2"
    pub slug: String,
    /// HTML anchor of the heading, e.g. "cachingapi-cache-api"
    pub anchor_id: String,
    /// Display text of the enclosing level-2 heading
    pub category: String,
    /// Anchor (or derived key) of the enclosing level-2 heading
    pub category_id: String,
    /// Space-joined paragraph, quote and list-item text under the heading
    pub summary: String,
    /// Outbound links under the heading, deduplicated by URL
    pub references: Vec<Reference>,
}

/// The persisted catalog produced by one build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// URL of the documentation page the catalog was built from
    pub source: String,
    /// RFC 3339 build timestamp
    pub generated_at: String,
    /// Declared entry count; `apis.len()` wins when the two disagree
    pub count: u64,
    pub apis: Vec<ApiEntry>,
}

impl ApiEntry {
    pub fn category_key(&self) -> String {
        if self.category_id.is_empty() {
            crate::text::normalize_key(&self.category)
        } else {
            crate::text::normalize_key(&self.category_id)
        }
    }

    pub fn to_detail(&self, source: &str, generated_at: &str) -> ApiDetail {
        ApiDetail {
            title: self.title.clone(),
            slug: self.slug.clone(),
            anchor_id: self.anchor_id.clone(),
            category: self.category.clone(),
            category_id: self.category_id.clone(),
            summary: self.summary.clone(),
            references: self.reference_infos(),
            source: source.to_string(),
            generated_at: generated_at.to_string(),
        }
    }

    pub fn to_search_result(&self) -> ApiSearchResult {
        ApiSearchResult {
            slug: self.slug.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            category_id: self.category_id.clone(),
            summary: self.summary.clone(),
            reference_count: self.references.len(),
        }
    }

    pub fn to_summary(&self) -> ApiSummary {
        ApiSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            references: self.reference_infos(),
        }
    }

    fn reference_infos(&self) -> Vec<ReferenceInfo> {
        self.references
            .iter()
            .map(|r| ReferenceInfo {
                title: r.title.clone(),
                url: r.url.clone(),
            })
            .collect()
    }
}
