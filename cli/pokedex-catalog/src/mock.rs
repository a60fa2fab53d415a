//! In-memory catalog for tests and offline use.
//!
//! [`MockClient`] serves a fixed species list and detail records through
//! the same [`CatalogApi`] interface as the HTTP client, records every request,
//! can be told to fail upcoming requests and can hold responses behind a gate.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::client::CatalogApi;
use crate::error::CatalogClientError;
use crate::types::{items_from_page, CatalogItem, ItemDetail, PageEntry};

/// Points the CLI at a file of [`MockData`] instead of the real catalog.
pub const POKEDEX_CATALOG_MOCK_DATA_VAR: &str = "_POKEDEX_USE_CATALOG_MOCK";

// Arc allows you to inspect the mock from outside once the client is moved
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// The data a [`MockClient`] serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockData {
    /// Catalog entries in domain order.
    pub species: Vec<PageEntry>,
    #[serde(default)]
    pub details: Vec<ItemDetail>,
}

#[derive(Debug, Error)]
pub enum MockDataError {
    /// Failed to read the JSON file pointed at by the mock data variable
    #[error("failed to read mock data file")]
    ReadMockFile(#[source] std::io::Error),
    /// Failed to parse the contents of the mock data file as JSON
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
}

/// A failure to inject into an upcoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Answer as if the catalog was down.
    Unavailable,
    /// Answer with a payload that does not decode.
    Malformed,
}

impl MockFailure {
    fn into_error(self, url: String) -> CatalogClientError {
        match self {
            MockFailure::Unavailable => CatalogClientError::UnexpectedStatus {
                status: StatusCode::SERVICE_UNAVAILABLE,
                url,
            },
            MockFailure::Malformed => {
                let source = serde_json::from_str::<PageEntry>("{\"name\": 7}")
                    .expect_err("mock payload should not decode");
                CatalogClientError::Decode(source)
            },
        }
    }
}

/// A request received by a [`MockClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRequest {
    Page { offset: u32, limit: u32 },
    All { limit: u32 },
    Detail { id: u32 },
}

#[derive(Debug, Default)]
struct Failures {
    pages: VecDeque<MockFailure>,
    all: VecDeque<MockFailure>,
    details: VecDeque<MockFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct MockClient {
    data: Arc<MockData>,
    failures: MockField<Failures>,
    requests: MockField<Vec<MockRequest>>,
    gate: Option<Arc<Semaphore>>,
    fetch_all_gate: Option<Arc<Semaphore>>,
}

impl MockClient {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Arc::new(data),
            ..Default::default()
        }
    }

    /// A catalog of the given species names with no detail records.
    pub fn with_species<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let species = names
            .into_iter()
            .map(|name| PageEntry {
                name: name.as_ref().to_string(),
                url: format!("mock://pokemon/{}", name.as_ref()),
            })
            .collect();
        Self::new(MockData {
            species,
            details: vec![],
        })
    }

    /// Read [`MockData`] from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
        let data = serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;
        Ok(Self::new(data))
    }

    /// Add a detail record.
    pub fn push_detail(&mut self, detail: ItemDetail) {
        Arc::make_mut(&mut self.data).details.push(detail);
    }

    /// Hold page and detail responses until a permit is added to `gate`.
    ///
    /// Every response consumes one permit. Bulk fetches are held
    /// by [`MockClient::with_fetch_all_gate`] instead.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Hold bulk responses until a permit is added to `gate`.
    pub fn with_fetch_all_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.fetch_all_gate = Some(gate);
        self
    }

    /// Fail the next page request with `failure`.
    pub fn fail_next_page(&self, failure: MockFailure) {
        self.lock_failures().pages.push_back(failure);
    }

    /// Fail the next bulk request with `failure`.
    pub fn fail_next_fetch_all(&self, failure: MockFailure) {
        self.lock_failures().all.push_back(failure);
    }

    /// Fail the next detail request with `failure`.
    pub fn fail_next_detail(&self, failure: MockFailure) {
        self.lock_failures().details.push_back(failure);
    }

    /// Every request received so far, in order of arrival.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, Failures> {
        self.failures.lock().expect("couldn't acquire mock lock")
    }

    fn record(&self, request: MockRequest) {
        debug!(?request, "mock catalog request");
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .push(request);
    }

    async fn wait_for_gate(gate: Option<&Arc<Semaphore>>) {
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .expect("mock gate should never be closed")
                .forget();
        }
    }

    fn slice(&self, offset: u32, limit: u32) -> Result<Vec<CatalogItem>, CatalogClientError> {
        let entries = self
            .data
            .species
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        items_from_page(offset, entries)
    }
}

impl CatalogApi for MockClient {
    async fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>, CatalogClientError> {
        self.record(MockRequest::Page { offset, limit });
        Self::wait_for_gate(self.gate.as_ref()).await;

        let failure = self.lock_failures().pages.pop_front();
        if let Some(failure) = failure {
            return Err(failure.into_error(format!(
                "mock://pokemon?offset={offset}&limit={limit}"
            )));
        }
        self.slice(offset, limit)
    }

    async fn fetch_all(&self, limit: u32) -> Result<Vec<CatalogItem>, CatalogClientError> {
        self.record(MockRequest::All { limit });
        Self::wait_for_gate(self.fetch_all_gate.as_ref()).await;

        let failure = self.lock_failures().all.pop_front();
        if let Some(failure) = failure {
            return Err(failure.into_error(format!("mock://pokemon?offset=0&limit={limit}")));
        }
        self.slice(0, limit)
    }

    async fn fetch_detail(&self, id: u32) -> Result<ItemDetail, CatalogClientError> {
        self.record(MockRequest::Detail { id });
        Self::wait_for_gate(self.gate.as_ref()).await;

        let url = format!("mock://pokemon/{id}");
        let failure = self.lock_failures().details.pop_front();
        if let Some(failure) = failure {
            return Err(failure.into_error(url));
        }
        self.data
            .details
            .iter()
            .find(|detail| detail.id == id)
            .cloned()
            .ok_or(CatalogClientError::UnexpectedStatus {
                status: StatusCode::NOT_FOUND,
                url,
            })
    }
}
