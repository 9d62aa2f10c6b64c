/// Catalog builder: documentation page HTML → versioned dataset.
///
/// Pipeline: [`html::parse_blocks`] → [`extract::extract_entries`] → [`SlugAssigner`] →
/// [`Dataset`]. Any structural problem aborts the whole build; no partial catalog is produced.
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};
use url::Url;

use crate::error::AppError;
use crate::extract::{self, RawEntry};
use crate::html;
use crate::model::{ApiEntry, Dataset};
use crate::slug::SlugAssigner;

pub const DEFAULT_SOURCE_URL: &str = "https://moodledev.io/docs/4.5/apis";

pub fn build_dataset(
    page_html: &str,
    source: &Url,
    generated_at: DateTime<Utc>,
) -> Result<Dataset, AppError> {
    let blocks = html::parse_blocks(page_html)?;
    debug!(blocks = blocks.len(), "parsed documentation page");

    let raw = extract::extract_entries(&blocks, source);
    if raw.is_empty() {
        return Err(AppError::Structure(
            "no API headings found under the content root".to_string(),
        ));
    }

    let apis = assign_slugs(raw)?;
    info!(entries = apis.len(), "extracted API entries");
    Ok(assemble(source, generated_at, apis))
}

/// Give every raw entry its slug in document order.
pub fn assign_slugs(raw: Vec<RawEntry>) -> Result<Vec<ApiEntry>, AppError> {
    let mut slugs = SlugAssigner::new();
    raw.into_iter()
        .map(|entry| {
            let slug = slugs.assign(&entry.title, &entry.anchor_id)?;
            Ok(ApiEntry {
                title: entry.title,
                slug,
                anchor_id: entry.anchor_id,
                category: entry.category,
                category_id: entry.category_id,
                summary: entry.summary,
                references: entry.references,
            })
        })
        .collect()
}

pub fn assemble(source: &Url, generated_at: DateTime<Utc>, apis: Vec<ApiEntry>) -> Dataset {
    Dataset {
        source: source.to_string(),
        generated_at: format_timestamp(generated_at),
        count: apis.len() as u64,
        apis,
    }
}

/// RFC 3339, UTC, millisecond precision: `2026-10-17T08:30:00.000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::Reference;
    use crate::testing::{FIXTURE_HTML, fixture_dataset, fixture_time, source_url};
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_the_cache_example_entry() {
        let dataset = fixture_dataset();
        assert_eq!(
            dataset.apis[0],
            ApiEntry {
                title: "Cache store API (cache) - overview".to_string(),
                slug: "cache".to_string(),
                anchor_id: "cachingapi-cache-api".to_string(),
                category: "Caching API".to_string(),
                category_id: "caching-api".to_string(),
                summary: "Provides key-value caching.".to_string(),
                references: vec![Reference {
                    title: "Cache docs".to_string(),
                    url: "https://example/cache".to_string(),
                }],
            }
        );
    }

    #[test]
    fn stamps_provenance_and_count() {
        let dataset = fixture_dataset();
        assert_eq!(dataset.source, "https://moodledev.io/docs/4.5/apis");
        assert_eq!(dataset.generated_at, "2026-10-17T08:30:00.000Z");
        assert_eq!(dataset.count, dataset.apis.len() as u64);
        assert_eq!(dataset.count, 7);
    }

    #[test]
    fn slugs_are_unique_and_stable_across_runs() {
        let first = fixture_dataset();
        let second = build_dataset(FIXTURE_HTML, &source_url(), fixture_time()).unwrap();

        let slugs: Vec<&str> = first.apis.iter().map(|a| a.slug.as_str()).collect();
        let distinct: HashSet<&str> = slugs.iter().copied().collect();
        assert_eq!(distinct.len(), slugs.len());
        assert_eq!(
            slugs,
            second.apis.iter().map(|a| a.slug.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(
            slugs,
            vec![
                "cache",
                "access-api",
                "quiz-attempt-api",
                "cache-2",
                "reports",
                "mod",
                "plugintypes-access-api",
            ]
        );
    }

    #[test]
    fn relative_links_resolve_against_source() {
        let dataset = fixture_dataset();
        let access = &dataset.apis[1];
        assert_eq!(
            access.references[0].url,
            "https://moodledev.io/docs/4.5/apis/subsystems/access"
        );
    }

    #[test]
    fn page_without_api_headings_is_rejected() {
        let html = r#"<article><div class="theme-doc-markdown"><h2 id="x">Only a category</h2></div></article>"#;
        let err = build_dataset(html, &source_url(), fixture_time()).unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
    }

    #[test]
    fn page_without_root_is_rejected() {
        let err = build_dataset("<p>nothing</p>", &source_url(), fixture_time()).unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
    }
}
