//! Text normalization shared by extraction, indexing and queries.

fn is_zero_width(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

/// Strip zero-width and control characters, collapse whitespace runs to a single space, trim.
pub fn clean_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if is_zero_width(ch) || ch.is_control() {
            continue;
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// URL-safe identifier: lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(s: &str) -> String {
    let cleaned = clean_text(s);
    let mut out = String::with_capacity(cleaned.len());
    let mut last_dash = false;
    for ch in cleaned.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_ascii_alphanumeric() {
            out.push(lc);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Lookup key used for aliases, identifiers, queries and category IDs.
pub fn normalize_key(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|ch| !is_zero_width(*ch))
        .collect::<String>()
        .trim()
        .to_string()
}
