//! Single-entry lookup by slug, anchor ID, title, or a fragment of one of them.

use crate::index::CatalogIndex;
use crate::model::ApiEntry;
use crate::text::normalize_key;

impl CatalogIndex {
    /// Resolve `identifier` to one entry.
    ///
    /// An exact alias match always wins. Otherwise the first entry in dataset order whose
    /// slug, title or anchor ID contains the identifier is returned. Callers rely on this
    /// ordering for deterministic disambiguation.
    pub fn resolve(&self, identifier: &str) -> Option<&ApiEntry> {
        let key = normalize_key(identifier);
        if key.is_empty() {
            return None;
        }

        if let Some(entry) = self.alias(&key) {
            return Some(entry);
        }

        self.entries().iter().find(|api| {
            api.slug.to_lowercase().contains(&key)
                || api.title.to_lowercase().contains(&key)
                || api.anchor_id.to_lowercase().contains(&key)
        })
    }
}
