/// Slug assignment for extracted API headings.
///
/// Candidates, first non-empty wins:
/// 1. A parenthesized short form near the end of the title: "Cache API (cache) - overview" → "cache"
/// 2. The last hyphen-separated anchor segment: "core-dml" → "dml", unless that segment is
///    "api", in which case the whole anchor: "access-api" → "access-api"
/// 3. The slugified title
///
/// Repeats of a base slug within one build get `-2`, `-3`, ... in encounter order.
use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::AppError;
use crate::text::slugify;

pub struct SlugAssigner {
    short_form_re: Regex,
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl Default for SlugAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl SlugAssigner {
    pub fn new() -> Self {
        Self {
            short_form_re: Regex::new(r"\(([^)]+)\)\s*(?:-|$)").expect("valid regex"),
            occurrences: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    /// The slug a heading would get ignoring collisions, or `None` when nothing usable remains.
    pub fn base_slug(&self, title: &str, anchor_id: &str) -> Option<String> {
        let from_title = self
            .short_form_re
            .captures(title)
            .map(|caps| slugify(&caps[1]))
            .filter(|s| !s.is_empty());
        if from_title.is_some() {
            return from_title;
        }

        let from_anchor = anchor_id
            .split('-')
            .filter(|part| !part.is_empty())
            .next_back()
            .map(|last| {
                if last == "api" {
                    slugify(anchor_id)
                } else {
                    slugify(last)
                }
            })
            .filter(|s| !s.is_empty());
        if from_anchor.is_some() {
            return from_anchor;
        }

        Some(slugify(title)).filter(|s| !s.is_empty())
    }

    /// Assign a unique slug. A heading that yields no slug at all aborts the build.
    pub fn assign(&mut self, title: &str, anchor_id: &str) -> Result<String, AppError> {
        let base = self.base_slug(title, anchor_id).ok_or_else(|| {
            AppError::Structure(format!("unable to determine slug for API heading: {title:?}"))
        })?;

        let occurrence = self.occurrences.entry(base.clone()).or_insert(0);
        *occurrence += 1;
        let mut n = *occurrence;
        let mut slug = if n == 1 { base.clone() } else { format!("{base}-{n}") };
        // A suffixed slug can collide with a heading whose natural slug already ends in "-N".
        while self.taken.contains(&slug) {
            n += 1;
            slug = format!("{base}-{n}");
        }
        *occurrence = n;

        self.taken.insert(slug.clone());
        Ok(slug)
    }
}
