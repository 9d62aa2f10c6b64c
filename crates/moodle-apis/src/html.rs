//! HTML adapter: flattens the documentation page into the [`Block`] stream the extractor walks.

use scraper::{ElementRef, Html, Selector};

use crate::error::AppError;
use crate::extract::{Block, Link};

/// Content container of a Docusaurus documentation page.
pub const ROOT_SELECTOR: &str = "article .theme-doc-markdown";

/// Parse `html` and return one block per direct element child of the content root.
pub fn parse_blocks(html: &str) -> Result<Vec<Block>, AppError> {
    let document = Html::parse_document(html);
    let root_selector = Selector::parse(ROOT_SELECTOR).expect("valid selector");
    let link_selector = Selector::parse("a[href]").expect("valid selector");
    let item_selector = Selector::parse("li").expect("valid selector");

    let root = document.select(&root_selector).next().ok_or_else(|| {
        AppError::Structure(format!(
            "content root `{ROOT_SELECTOR}` not found in documentation page"
        ))
    })?;

    let blocks = root
        .children()
        .filter_map(ElementRef::wrap)
        .map(|element| {
            let links = collect_links(element, &link_selector);
            let tag = element.value().name().to_ascii_lowercase();
            match tag.as_str() {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Block::Heading {
                    level: tag[1..].parse().unwrap_or(6),
                    text: element_text(element),
                    anchor: element.value().attr("id").map(str::to_string),
                    links,
                },
                "p" | "div" => Block::Paragraph {
                    text: element_text(element),
                    links,
                },
                "blockquote" => Block::Quote {
                    text: element_text(element),
                    links,
                },
                "ul" | "ol" => Block::List {
                    items: element.select(&item_selector).map(element_text).collect(),
                    links,
                },
                _ => Block::Generic { links },
            }
        })
        .collect();

    Ok(blocks)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn collect_links(element: ElementRef<'_>, selector: &Selector) -> Vec<Link> {
    element
        .select(selector)
        .filter_map(|a| {
            a.value().attr("href").map(|href| Link {
                text: element_text(a),
                href: href.to_string(),
            })
        })
        .collect()
}
