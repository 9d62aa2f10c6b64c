/// Extractor: turns the ordered block stream of the documentation page into raw API records.
///
/// The page has a flat structure under its content root:
/// - Category headers: `<h2 id="...">Category</h2>`
/// - API headers: `<h3 id="...">Title</h3>`
/// - Everything up to the next heading of level 1-3 belongs to the open API entry
///
/// Paragraph, quote and list-item text feeds the summary. Links are harvested from every
/// block in the window, including blocks whose text is ignored.
use std::collections::HashSet;

use url::Url;

use crate::model::Reference;
use crate::text::{clean_text, slugify};

const CATEGORY_LEVEL: u8 = 2;
const ENTRY_LEVEL: u8 = 3;
const DEFAULT_CATEGORY_TITLE: &str = "General";
const DEFAULT_CATEGORY_ID: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// A block-level node directly under the content root, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        anchor: Option<String>,
        links: Vec<Link>,
    },
    Paragraph {
        text: String,
        links: Vec<Link>,
    },
    Quote {
        text: String,
        links: Vec<Link>,
    },
    List {
        items: Vec<String>,
        links: Vec<Link>,
    },
    Generic {
        links: Vec<Link>,
    },
}

impl Block {
    pub fn links(&self) -> &[Link] {
        match self {
            Block::Heading { links, .. }
            | Block::Paragraph { links, .. }
            | Block::Quote { links, .. }
            | Block::List { links, .. }
            | Block::Generic { links } => links,
        }
    }
}

/// An extracted API record before slug assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub anchor_id: String,
    pub category: String,
    pub category_id: String,
    pub summary: String,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone)]
struct CategoryContext {
    title: String,
    id: String,
}

impl CategoryContext {
    fn from_heading(text: &str, anchor: Option<&str>) -> Self {
        let title = clean_text(text);
        let id = match anchor.filter(|a| !a.is_empty()) {
            Some(anchor) => anchor.to_string(),
            None => {
                let derived = slugify(&title);
                if derived.is_empty() {
                    "category".to_string()
                } else {
                    derived
                }
            }
        };
        Self { title, id }
    }

    fn fallback() -> Self {
        Self {
            title: DEFAULT_CATEGORY_TITLE.to_string(),
            id: DEFAULT_CATEGORY_ID.to_string(),
        }
    }
}

struct OpenEntry {
    title: String,
    anchor_id: String,
    category: CategoryContext,
    parts: Vec<String>,
    references: Vec<Reference>,
}

impl OpenEntry {
    fn new(text: &str, anchor: Option<&str>, category: Option<&CategoryContext>) -> Self {
        let title = clean_text(text);
        let anchor_id = anchor
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(&title));
        Self {
            title,
            anchor_id,
            category: category.cloned().unwrap_or_else(CategoryContext::fallback),
            parts: Vec::new(),
            references: Vec::new(),
        }
    }

    fn absorb(&mut self, block: &Block, base: &Url) {
        match block {
            Block::Paragraph { text, .. } | Block::Quote { text, .. } => self.push_text(text),
            Block::List { items, .. } => {
                for item in items {
                    self.push_text(item);
                }
            }
            Block::Heading { .. } | Block::Generic { .. } => {}
        }
        self.references
            .extend(block.links().iter().filter_map(|link| resolve_link(link, base)));
    }

    fn push_text(&mut self, text: &str) {
        let cleaned = clean_text(text);
        if !cleaned.is_empty() {
            self.parts.push(cleaned);
        }
    }

    fn finish(self) -> RawEntry {
        RawEntry {
            title: self.title,
            anchor_id: self.anchor_id,
            category: self.category.title,
            category_id: self.category.id,
            summary: self.parts.join(" "),
            references: dedupe_references(self.references),
        }
    }
}

/// Walk `blocks` once, emitting one record per level-3 heading in document order.
pub fn extract_entries(blocks: &[Block], base: &Url) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    let mut category: Option<CategoryContext> = None;
    let mut open: Option<OpenEntry> = None;

    for block in blocks {
        match block {
            Block::Heading {
                level,
                text,
                anchor,
                ..
            } if *level <= ENTRY_LEVEL => {
                if let Some(entry) = open.take() {
                    entries.push(entry.finish());
                }
                match *level {
                    CATEGORY_LEVEL => {
                        category = Some(CategoryContext::from_heading(text, anchor.as_deref()));
                    }
                    ENTRY_LEVEL => {
                        open = Some(OpenEntry::new(text, anchor.as_deref(), category.as_ref()));
                    }
                    _ => {}
                }
            }
            _ => {
                if let Some(entry) = open.as_mut() {
                    entry.absorb(block, base);
                }
            }
        }
    }

    if let Some(entry) = open.take() {
        entries.push(entry.finish());
    }
    entries
}

/// Resolve a link against the page URL. Links that do not resolve are dropped.
fn resolve_link(link: &Link, base: &Url) -> Option<Reference> {
    let href = link.href.trim();
    if href.is_empty() {
        return None;
    }
    let url = base.join(href).ok()?.to_string();
    let label = clean_text(&link.text);
    Some(Reference {
        title: if label.is_empty() { url.clone() } else { label },
        url,
    })
}

/// Keep the first reference seen for each URL, preserving order.
pub fn dedupe_references(references: Vec<Reference>) -> Vec<Reference> {
    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}
