//! Catalog client for the PokéAPI species endpoints.

use std::fmt::Debug;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{AssetUrls, CatalogClientConfig};
use crate::error::CatalogClientError;
use crate::mock::MockClient;
use crate::types::{items_from_page, CatalogItem, DetailResponse, ItemDetail, PageResponse};

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The complete catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the PokéAPI via [`CatalogClient`]
/// - **Mock**: canned responses without HTTP via [`MockClient`]
///
/// None of the implementations retry; retrying is up to the caller.
pub trait CatalogApi {
    /// Fetch `limit` species starting at `offset`.
    ///
    /// Item ids are `offset + 1, offset + 2, ...` in response order.
    fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, CatalogClientError>> + Send;

    /// Fetch the first `limit` species in a single request.
    fn fetch_all(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, CatalogClientError>> + Send {
        self.fetch_page(0, limit)
    }

    /// Fetch the detail record of the species with `id`.
    fn fetch_detail(
        &self,
        id: u32,
    ) -> impl Future<Output = Result<ItemDetail, CatalogClientError>> + Send;
}

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

impl From<CatalogClient> for Client {
    fn from(client: CatalogClient) -> Self {
        Client::Catalog(client)
    }
}

impl From<MockClient> for Client {
    fn from(client: MockClient) -> Self {
        Client::Mock(client)
    }
}

impl CatalogApi for Client {
    async fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>, CatalogClientError> {
        match self {
            Client::Catalog(client) => client.fetch_page(offset, limit).await,
            Client::Mock(client) => client.fetch_page(offset, limit).await,
        }
    }

    async fn fetch_all(&self, limit: u32) -> Result<Vec<CatalogItem>, CatalogClientError> {
        match self {
            Client::Catalog(client) => client.fetch_all(limit).await,
            Client::Mock(client) => client.fetch_all(limit).await,
        }
    }

    async fn fetch_detail(&self, id: u32) -> Result<ItemDetail, CatalogClientError> {
        match self {
            Client::Catalog(client) => client.fetch_detail(id).await,
            Client::Mock(client) => client.fetch_detail(id).await,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// A client for the PokéAPI.
///
/// Handles:
/// - HTTP client configuration with timeouts
/// - Endpoint construction from the configured base URL
/// - Mapping transport, status and payload failures to [`CatalogClientError`]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Asset locations for items served by this client.
    pub fn assets(&self) -> &AssetUrls {
        &self.config.assets
    }

    /// `{base}/pokemon?offset={offset}&limit={limit}`
    fn page_url(&self, offset: u32, limit: u32) -> Result<Url, CatalogClientError> {
        if limit == 0 {
            return Err(CatalogClientError::InvalidRequest(
                "page limit must be at least 1".to_string(),
            ));
        }
        let mut url = self.resource_url(&["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// `{base}/pokemon/{id}`
    fn detail_url(&self, id: u32) -> Result<Url, CatalogClientError> {
        if id == 0 {
            return Err(CatalogClientError::InvalidRequest(
                "species ids start at 1".to_string(),
            ));
        }
        self.resource_url(&["pokemon", &id.to_string()])
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url, CatalogClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogClientError::InvalidRequest(format!(
                    "catalog url '{}' cannot have a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a `GET` to `url` and decode a successful response body as `T`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogClientError> {
        debug!(%url, "sending catalog request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(CatalogClientError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogClientError::UnexpectedStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(CatalogClientError::Network)?;
        serde_json::from_slice(&body).map_err(CatalogClientError::Decode)
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>, CatalogClientError> {
        let url = self.page_url(offset, limit)?;
        let response: PageResponse = self.get_json(url).await?;

        tracing::debug!(
            count = response.count,
            n_results = response.results.len(),
            "received catalog page"
        );

        items_from_page(offset, response.results)
    }

    #[instrument(skip(self))]
    async fn fetch_detail(&self, id: u32) -> Result<ItemDetail, CatalogClientError> {
        let url = self.detail_url(id)?;
        let response: DetailResponse = self.get_json(url).await?;
        Ok(response.into())
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn parse_base_url(base_url: &str) -> Result<Url, CatalogClientError> {
    let url = Url::parse(base_url).map_err(|e| {
        CatalogClientError::InvalidRequest(format!("catalog url '{base_url}' is invalid: {e}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(CatalogClientError::InvalidRequest(format!(
            "catalog url '{base_url}' cannot have a path"
        )));
    }
    Ok(url)
}

/// Build the HTTP client used for all catalog requests.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(|e: header::InvalidHeaderName| {
                CatalogClientError::InvalidRequest(e.to_string())
            })?,
            header::HeaderValue::from_str(value).map_err(|e: header::InvalidHeaderValue| {
                CatalogClientError::InvalidRequest(e.to_string())
            })?,
        );
    }

    debug!(
        base_url = %config.base_url,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::InvalidRequest(e.to_string()))
}
