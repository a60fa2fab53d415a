//! Page navigation over a bounded catalog.
//!
//! [`PagingController`] is a plain state machine: navigation calls hand out
//! [`PageRequest`]s, and the caller feeds the outcome of each request back
//! through [`PagingController::complete`]. It never performs I/O itself.

use std::cmp::min;
use std::num::NonZeroU32;

use pokedex_catalog::{CatalogClientError, CatalogItem};
use tracing::{debug, warn};

const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(20).unwrap();
/// The original 151 species.
const DEFAULT_TOTAL_ITEMS: u32 = 151;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Number of items on a page.
    pub page_size: NonZeroU32,
    /// Size of the bounded domain; items past it are never shown.
    pub total_items: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            total_items: DEFAULT_TOTAL_ITEMS,
        }
    }
}

impl PagingConfig {
    /// `ceil(total_items / page_size)`, but at least one page.
    pub fn total_pages(&self) -> u32 {
        self.total_items.div_ceil(self.page_size.get()).max(1)
    }

    /// Offset of the first item on the 1-based `page`.
    pub fn page_offset(&self, page: u32) -> u32 {
        page.saturating_sub(1) * self.page_size.get()
    }
}

/// A navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Load page 1, even while another page is loading.
    First,
    Next,
    Previous,
    /// Load a 1-based page.
    Page(u32),
}

/// A page fetch handed out by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Distinguishes this request from superseded ones.
    pub generation: u64,
    pub offset: u32,
    pub limit: u32,
}

/// What [`PagingController::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The page is now the current page.
    Applied,
    /// The fetch failed; the previous page stays current.
    Failed,
    /// A newer request was issued since; the result was dropped.
    Stale,
}

#[derive(Debug)]
pub struct PagingController {
    config: PagingConfig,
    current_page: u32,
    items: Vec<CatalogItem>,
    last_error: Option<String>,
    in_flight: Option<PageRequest>,
    generation: u64,
}

impl PagingController {
    pub fn new(config: PagingConfig) -> Self {
        Self {
            config,
            current_page: 1,
            items: Vec::new(),
            last_error: None,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.config.total_pages()
    }

    /// Items of the current page.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a navigation.
    ///
    /// Returns the fetch to perform, or `None` if the navigation is not
    /// possible from the current state or there is nothing left to fetch.
    pub fn request(&mut self, navigation: Navigation) -> Option<PageRequest> {
        let total_pages = self.total_pages();
        let offset = match navigation {
            Navigation::First => 0,
            _ if self.is_loading() => {
                debug!(?navigation, "ignoring navigation while a page is loading");
                return None;
            },
            Navigation::Next if self.current_page < total_pages => {
                self.config.page_offset(self.current_page + 1)
            },
            Navigation::Previous if self.current_page > 1 => {
                self.config.page_offset(self.current_page - 1)
            },
            Navigation::Page(page) if (1..=total_pages).contains(&page) => {
                self.config.page_offset(page)
            },
            _ => {
                debug!(
                    ?navigation,
                    current_page = self.current_page,
                    total_pages,
                    "ignoring navigation out of range"
                );
                return None;
            },
        };

        self.last_error = None;
        self.generation += 1;

        if offset >= self.config.total_items {
            // supersede anything still in flight, but there is nothing to load
            self.in_flight = None;
            return None;
        }

        let request = PageRequest {
            generation: self.generation,
            offset,
            limit: min(self.config.page_size.get(), self.config.total_items - offset),
        };
        self.in_flight = Some(request);
        Some(request)
    }

    /// Apply the outcome of `request`.
    ///
    /// A failure keeps the current page and its items and only records the error.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Vec<CatalogItem>, CatalogClientError>,
    ) -> Completion {
        if self.in_flight != Some(request) {
            debug!(
                generation = request.generation,
                latest = self.generation,
                "dropping superseded page"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(mut items) => {
                items.retain(|item| item.id <= self.config.total_items);
                self.items = items;
                self.current_page = request.offset / self.config.page_size.get() + 1;
                debug!(
                    current_page = self.current_page,
                    n_items = self.items.len(),
                    "page loaded"
                );
                Completion::Applied
            },
            Err(err) => {
                warn!(kind = ?err.kind(), %err, offset = request.offset, "failed to load page");
                self.last_error = Some(err.to_string());
                Completion::Failed
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pokedex_catalog::{CatalogClientError, CatalogItem, StatusCode};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn items(ids: std::ops::RangeInclusive<u32>) -> Vec<CatalogItem> {
        ids.map(|id| CatalogItem {
            id,
            name: format!("Species{id}"),
            source_url: format!("mock://pokemon/{id}"),
        })
        .collect()
    }

    fn unavailable() -> CatalogClientError {
        CatalogClientError::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "mock://pokemon".to_string(),
        }
    }

    /// Start `navigation` and complete it with the items the server would return.
    fn load(paging: &mut PagingController, navigation: Navigation) -> PageRequest {
        let request = paging.request(navigation).expect("navigation should fetch");
        let first = request.offset + 1;
        let last = request.offset + request.limit;
        assert_eq!(
            paging.complete(request, Ok(items(first..=last))),
            Completion::Applied
        );
        request
    }

    #[test]
    fn kanto_has_eight_pages() {
        assert_eq!(PagingConfig::default().total_pages(), 8);
    }

    #[test]
    fn empty_domain_has_one_page() {
        let config = PagingConfig {
            total_items: 0,
            ..Default::default()
        };
        assert_eq!(config.total_pages(), 1);

        let mut paging = PagingController::new(config);
        assert_eq!(paging.request(Navigation::First), None);
        assert!(!paging.is_loading());
    }

    #[test]
    fn navigation_offsets() {
        let mut paging = PagingController::new(PagingConfig::default());
        assert_eq!(load(&mut paging, Navigation::First).offset, 0);
        assert_eq!(load(&mut paging, Navigation::Next).offset, 20);
        assert_eq!(paging.current_page(), 2);
        assert_eq!(load(&mut paging, Navigation::Page(8)).offset, 140);
        assert_eq!(paging.current_page(), 8);
        assert_eq!(load(&mut paging, Navigation::Previous).offset, 120);
        assert_eq!(paging.current_page(), 7);
    }

    #[test]
    fn last_page_is_truncated_to_domain() {
        let mut paging = PagingController::new(PagingConfig::default());
        let request = paging.request(Navigation::Page(8)).unwrap();
        assert_eq!(request.limit, 11);

        // the server ignores the limit and sends a full page
        paging.complete(request, Ok(items(141..=160)));
        assert_eq!(paging.items().last().map(|item| item.id), Some(151));
        assert_eq!(paging.items().len(), 11);
    }

    #[test]
    fn navigation_out_of_range_is_a_noop() {
        let mut paging = PagingController::new(PagingConfig::default());
        load(&mut paging, Navigation::First);

        assert_eq!(paging.request(Navigation::Previous), None);
        assert_eq!(paging.request(Navigation::Page(0)), None);
        assert_eq!(paging.request(Navigation::Page(9)), None);
        assert!(!paging.is_loading());

        load(&mut paging, Navigation::Page(8));
        assert_eq!(paging.request(Navigation::Next), None);
        assert_eq!(paging.current_page(), 8);
    }

    #[test]
    fn only_one_page_in_flight() {
        let mut paging = PagingController::new(PagingConfig::default());
        load(&mut paging, Navigation::First);

        let pending = paging.request(Navigation::Next).unwrap();
        assert!(paging.is_loading());
        assert_eq!(paging.request(Navigation::Next), None);
        assert_eq!(paging.request(Navigation::Previous), None);
        assert_eq!(paging.request(Navigation::Page(3)), None);

        paging.complete(pending, Ok(items(21..=40)));
        assert!(!paging.is_loading());
        assert_eq!(paging.current_page(), 2);
    }

    #[test]
    fn failure_keeps_previous_page() {
        let mut paging = PagingController::new(PagingConfig::default());
        load(&mut paging, Navigation::Page(3));
        let before = paging.items().to_vec();

        let request = paging.request(Navigation::Next).unwrap();
        assert_eq!(paging.complete(request, Err(unavailable())), Completion::Failed);

        assert_eq!(paging.current_page(), 3);
        assert_eq!(paging.items(), before.as_slice());
        assert!(!paging.is_loading());
        assert!(!paging.last_error().unwrap_or_default().is_empty());

        // retrying clears the error
        load(&mut paging, Navigation::Next);
        assert_eq!(paging.last_error(), None);
        assert_eq!(paging.current_page(), 4);
    }

    #[test]
    fn first_page_supersedes_pending_request() {
        let mut paging = PagingController::new(PagingConfig::default());
        load(&mut paging, Navigation::First);

        let slow = paging.request(Navigation::Page(5)).unwrap();
        let restart = paging.request(Navigation::First).unwrap();
        assert!(restart.generation > slow.generation);

        assert_eq!(paging.complete(restart, Ok(items(1..=20))), Completion::Applied);
        assert_eq!(paging.complete(slow, Ok(items(81..=100))), Completion::Stale);
        assert_eq!(paging.current_page(), 1);
        assert_eq!(paging.items()[0].id, 1);
    }

    #[test]
    fn loading_first_page_twice_is_idempotent() {
        let mut paging = PagingController::new(PagingConfig::default());
        load(&mut paging, Navigation::First);
        let once = (paging.current_page(), paging.items().to_vec());
        load(&mut paging, Navigation::First);
        let twice = (paging.current_page(), paging.items().to_vec());
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling(total_items in 0..5_000_u32, page_size in 1..200_u32) {
            let config = PagingConfig {
                page_size: NonZeroU32::new(page_size).unwrap(),
                total_items,
            };
            let expected = ((total_items as f64) / (page_size as f64)).ceil().max(1.0) as u32;
            prop_assert_eq!(config.total_pages(), expected);
        }

        #[test]
        fn go_to_page_stays_in_range(page in 0..20_u32) {
            let mut paging = PagingController::new(PagingConfig::default());
            let request = paging.request(Navigation::Page(page));
            prop_assert_eq!(request.is_some(), (1..=8).contains(&page));
            if let Some(request) = request {
                prop_assert_eq!(request.offset, (page - 1) * 20);
            }
        }
    }
}
