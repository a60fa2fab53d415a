//! Local copy of the bounded catalog, used to answer searches.

use pokedex_catalog::CatalogItem;

/// The full catalog in domain order.
///
/// Filled once by the warm-up fetch and never invalidated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    items: Vec<CatalogItem>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cache holds the whole domain of `total_items`.
    pub fn is_complete(&self, total_items: u32) -> bool {
        !self.items.is_empty() && self.items.len() >= total_items as usize
    }

    /// Replace the contents with `items` unless the domain is already complete.
    ///
    /// Returns whether the cache changed.
    pub fn populate(&mut self, mut items: Vec<CatalogItem>, total_items: u32) -> bool {
        if self.is_complete(total_items) {
            return false;
        }
        items.retain(|item| item.id <= total_items);
        self.items = items;
        true
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items `[(page - 1) * page_size, page * page_size)`, clamped to what is cached.
    ///
    /// `None` if the page starts past the cached items.
    pub fn page_slice(&self, page: u32, page_size: u32) -> Option<&[CatalogItem]> {
        let start = page.saturating_sub(1) as usize * page_size as usize;
        if start >= self.items.len() {
            return None;
        }
        let end = (start + page_size as usize).min(self.items.len());
        Some(&self.items[start..end])
    }

    /// Every item whose name contains `query`, ignoring case.
    pub fn matching(&self, query: &str) -> Vec<CatalogItem> {
        let query = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}
