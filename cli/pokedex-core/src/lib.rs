//! Paging, search and detail orchestration on top of [`pokedex_catalog`].
//!
//! [`CatalogHandle`] is the entry point for listings: it spawns a single
//! owner task that drives the [`PagingController`], fills the
//! [`CatalogCache`] and answers queries through the [`SearchController`].
//! Consumers observe the result as a stream of [`CatalogView`] snapshots.
//!
//! [`DetailLoader`] does the same for per-species detail records.

pub mod cache;
pub mod detail;
pub mod paging;
pub mod search;
pub mod service;

pub use cache::CatalogCache;
pub use detail::{DetailLoader, DetailState};
pub use paging::{Completion, Navigation, PageRequest, PagingConfig, PagingController};
pub use search::SearchController;
pub use service::{CatalogHandle, CatalogView, ServiceError, WarmUp};
