//! Human-readable text returned next to the structured tool and resource payloads.

use mcp_common::mcp_api::{ApiDetail, ApiSearchResult};

pub const NO_MATCHES: &str = "No Moodle 4.5 APIs matched the requested filters.";

const NO_SUMMARY: &str = "No summary text was found on the Moodle documentation page.";
const NO_REFERENCES: &str = "No direct documentation links were captured for this entry.";

/// Markdown description of one entry, ending with the dataset provenance.
pub fn api_markdown(api: &ApiDetail) -> String {
    let summary = if api.summary.is_empty() {
        NO_SUMMARY
    } else {
        api.summary.as_str()
    };
    let references = if api.references.is_empty() {
        NO_REFERENCES.to_string()
    } else {
        api.references
            .iter()
            .map(|r| format!("- [{}]({})", r.title, r.url))
            .collect::<Vec<_>>()
            .join("\n")
    };

    [
        format!("# {}", api.title),
        String::new(),
        format!("Slug: {}", api.slug),
        format!("Category: {}", api.category),
        format!("Documentation anchor: {}", api.anchor_id),
        String::new(),
        "## Summary".to_string(),
        summary.to_string(),
        String::new(),
        "## Primary references".to_string(),
        references,
        String::new(),
        format!("Source catalogue: {}", api.source),
        format!("Dataset generated: {}", api.generated_at),
    ]
    .join("\n")
}

/// Numbered listing of search hits.
pub fn search_listing(results: &[ApiSearchResult]) -> String {
    if results.is_empty() {
        return NO_MATCHES.to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let links = match r.reference_count {
                1 => "1 reference link".to_string(),
                n => format!("{n} reference links"),
            };
            format!("{}. {} ({}): {links}", i + 1, r.title, r.slug)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
