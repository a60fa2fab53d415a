//! Client side search over the [`CatalogCache`].

use pokedex_catalog::CatalogItem;

use crate::cache::CatalogCache;
use crate::paging::PagingController;

/// Holds the active query and resolves it against the cache.
///
/// A non-empty query matches across the whole cached domain, not just the
/// current page. Results are partial until the cache has been warmed up.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    query: String,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Set the active query and resolve it.
    pub fn search(
        &mut self,
        query: impl Into<String>,
        cache: &CatalogCache,
        paging: &PagingController,
    ) -> Option<Vec<CatalogItem>> {
        self.query = query.into();
        self.matches(cache, paging)
    }

    /// Same as searching for `""`.
    pub fn clear(
        &mut self,
        cache: &CatalogCache,
        paging: &PagingController,
    ) -> Option<Vec<CatalogItem>> {
        self.search("", cache, paging)
    }

    /// The items to show for the active query.
    ///
    /// Without a query this is the current page's slice of the cache.
    /// `None` means there is nothing better to show than what is already shown.
    pub fn matches(
        &self,
        cache: &CatalogCache,
        paging: &PagingController,
    ) -> Option<Vec<CatalogItem>> {
        if self.query.is_empty() {
            cache
                .page_slice(paging.current_page(), paging.config().page_size.get())
                .map(<[CatalogItem]>::to_vec)
        } else {
            Some(cache.matching(&self.query))
        }
    }
}
