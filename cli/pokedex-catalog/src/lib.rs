//! HTTP client for the PokéAPI species catalog.
//!
//! This crate provides:
//! - The [`CatalogApi`] trait with its paged listing, bulk listing and detail calls
//! - [`CatalogClient`], the reqwest backed implementation
//! - [`MockClient`], a canned in-memory implementation for tests and offline use
//! - Error handling shared by all implementations
//!
//! ## Usage
//!
//! ```ignore
//! use pokedex_catalog::{CatalogApi, CatalogClient, CatalogClientConfig};
//!
//! let client = CatalogClient::new(CatalogClientConfig::default())?;
//! let first_page = client.fetch_page(0, 20).await?;
//! let bulbasaur = client.fetch_detail(1).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
pub mod types;

pub use client::{CatalogApi, CatalogClient, Client};
pub use config::{AssetUrls, CatalogClientConfig, DEFAULT_BASE_URL};
pub use error::{CatalogClientError, ErrorKind};
pub use mock::{
    MockClient,
    MockData,
    MockDataError,
    MockFailure,
    MockRequest,
    POKEDEX_CATALOG_MOCK_DATA_VAR,
};
pub use reqwest::StatusCode;
pub use types::{CatalogItem, ItemDetail, StatValue, TypeSlot};
