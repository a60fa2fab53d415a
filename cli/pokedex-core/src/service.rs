//! The catalog service: one task owning paging, cache and search state.
//!
//! Every mutation happens on the service task. Handles send commands,
//! fetches run as separate tasks and report back over a channel, so page
//! results, the cache warm-up and searches are applied strictly one at a time.
//! After each change the service publishes a fresh [`CatalogView`].

use std::sync::Arc;

use pokedex_catalog::{CatalogApi, CatalogClientError, CatalogItem};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, debug_span, warn, Instrument};

use crate::cache::CatalogCache;
use crate::paging::{Completion, Navigation, PageRequest, PagingConfig, PagingController};
use crate::search::SearchController;

/// Snapshot of everything a front-end needs to render the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    /// The current page, or the search matches while a query is active.
    pub items: Vec<CatalogItem>,
    pub query: String,
    pub is_loading: bool,
    /// Message of the last failed page fetch, cleared by the next navigation.
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    /// Number of items available to search.
    pub cached: usize,
    pub warming_up: bool,
}

/// Whether successful page loads also fill the search cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarmUp {
    #[default]
    Enabled,
    /// Only pages are fetched, searches see an empty cache.
    Disabled,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("catalog service has stopped")]
    Closed,
}

enum Command {
    Navigate {
        navigation: Navigation,
        reply: oneshot::Sender<bool>,
    },
    Search {
        query: String,
        reply: oneshot::Sender<()>,
    },
}

enum Fetched {
    Page(PageRequest, Result<Vec<CatalogItem>, CatalogClientError>),
    WarmUp(Result<Vec<CatalogItem>, CatalogClientError>),
}

/// Cloneable access to a running catalog service.
///
/// The service stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<CatalogView>,
}

impl CatalogHandle {
    /// Start a catalog service on the current tokio runtime.
    pub fn spawn<C>(client: Arc<C>, config: PagingConfig) -> Self
    where
        C: CatalogApi + Send + Sync + 'static,
    {
        Self::spawn_with(client, config, WarmUp::default())
    }

    /// Like [`CatalogHandle::spawn`], choosing whether to warm up the search cache.
    pub fn spawn_with<C>(client: Arc<C>, config: PagingConfig, warm_up: WarmUp) -> Self
    where
        C: CatalogApi + Send + Sync + 'static,
    {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (fetched_tx, fetched_rx) = mpsc::unbounded_channel();

        let service = CatalogService {
            client,
            paging: PagingController::new(config),
            cache: CatalogCache::new(),
            search: SearchController::new(),
            visible: Vec::new(),
            warm_up,
            warming_up: false,
            fetched: fetched_tx,
            view: watch::Sender::new(CatalogView::default()),
        };
        let view = service.view.subscribe();
        service.publish();

        tokio::spawn(
            service
                .run(commands_rx, fetched_rx)
                .instrument(debug_span!("catalog_service")),
        );

        Self {
            commands: commands_tx,
            view,
        }
    }

    /// Load page 1, superseding any page still loading.
    ///
    /// Resolves once the service accepted the command, with whether a fetch
    /// was started. The same holds for the other navigation methods.
    pub async fn load_first_page(&self) -> Result<bool, ServiceError> {
        self.navigate(Navigation::First).await
    }

    pub async fn load_next_page(&self) -> Result<bool, ServiceError> {
        self.navigate(Navigation::Next).await
    }

    pub async fn load_previous_page(&self) -> Result<bool, ServiceError> {
        self.navigate(Navigation::Previous).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<bool, ServiceError> {
        self.navigate(Navigation::Page(page)).await
    }

    /// Show every cached item matching `query`, or the current page if it is empty.
    pub async fn search(&self, query: impl Into<String>) -> Result<(), ServiceError> {
        let (reply, done) = oneshot::channel();
        self.commands
            .send(Command::Search {
                query: query.into(),
                reply,
            })
            .map_err(|_| ServiceError::Closed)?;
        done.await.map_err(|_| ServiceError::Closed)
    }

    pub async fn clear_search(&self) -> Result<(), ServiceError> {
        self.search("").await
    }

    /// The latest published view.
    pub fn view(&self) -> CatalogView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogView> {
        self.view.clone()
    }

    /// Wait until a published view satisfies `predicate` and return it.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&CatalogView) -> bool,
    ) -> Result<CatalogView, ServiceError> {
        let mut view = self.view.clone();
        let matched = view
            .wait_for(predicate)
            .await
            .map_err(|_| ServiceError::Closed)?;
        Ok(CatalogView::clone(&matched))
    }

    /// Wait for the current page fetch, if any, to finish.
    pub async fn wait_until_idle(&self) -> Result<CatalogView, ServiceError> {
        self.wait_for(|view| !view.is_loading).await
    }

    async fn navigate(&self, navigation: Navigation) -> Result<bool, ServiceError> {
        let (reply, started) = oneshot::channel();
        self.commands
            .send(Command::Navigate { navigation, reply })
            .map_err(|_| ServiceError::Closed)?;
        started.await.map_err(|_| ServiceError::Closed)
    }
}

struct CatalogService<C> {
    client: Arc<C>,
    paging: PagingController,
    cache: CatalogCache,
    search: SearchController,
    visible: Vec<CatalogItem>,
    warm_up: WarmUp,
    warming_up: bool,
    fetched: mpsc::UnboundedSender<Fetched>,
    view: watch::Sender<CatalogView>,
}

impl<C> CatalogService<C>
where
    C: CatalogApi + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut fetched: mpsc::UnboundedReceiver<Fetched>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("all handles dropped, stopping catalog service");
                        break;
                    };
                    self.handle_command(command);
                },
                // never closes, the service holds a sender
                Some(result) = fetched.recv() => {
                    self.handle_fetched(result);
                    self.publish();
                },
            }
        }
    }

    /// Apply a command and publish the new view before acknowledging it.
    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Navigate { navigation, reply } => {
                let started = match self.paging.request(navigation) {
                    Some(request) => {
                        self.fetch_page(request);
                        true
                    },
                    None => false,
                };
                self.publish();
                // the caller may have given up waiting
                let _ = reply.send(started);
            },
            Command::Search { query, reply } => {
                debug!(%query, "searching cached catalog");
                let results = self.search.search(query, &self.cache, &self.paging);
                self.visible = results.unwrap_or_else(|| self.paging.items().to_vec());
                self.publish();
                let _ = reply.send(());
            },
        }
    }

    fn handle_fetched(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Page(request, result) => {
                if self.paging.complete(request, result) != Completion::Applied {
                    return;
                }
                self.visible = self.paging.items().to_vec();
                if self.warm_up == WarmUp::Enabled
                    && !self.cache.is_complete(self.paging.config().total_items)
                {
                    self.warm_up();
                }
                if self.search.is_active() {
                    self.show_search_results();
                }
            },
            Fetched::WarmUp(result) => {
                self.warming_up = false;
                match result {
                    Ok(items) => {
                        self.cache
                            .populate(items, self.paging.config().total_items);
                        debug!(cached = self.cache.len(), "search cache warmed up");
                        if self.search.is_active() {
                            self.show_search_results();
                        }
                    },
                    Err(err) => {
                        warn!(kind = ?err.kind(), %err, "failed to warm up search cache");
                    },
                }
            },
        }
    }

    fn show_search_results(&mut self) {
        self.visible = self
            .search
            .matches(&self.cache, &self.paging)
            .unwrap_or_else(|| self.paging.items().to_vec());
    }

    fn fetch_page(&self, request: PageRequest) {
        let client = Arc::clone(&self.client);
        let fetched = self.fetched.clone();
        tokio::spawn(
            async move {
                let result = client.fetch_page(request.offset, request.limit).await;
                // the service may have stopped in the meantime
                let _ = fetched.send(Fetched::Page(request, result));
            }
            .instrument(debug_span!(
                "fetch_page",
                generation = request.generation,
                offset = request.offset,
                limit = request.limit
            )),
        );
    }

    /// Fetch the whole domain into the cache, unless that is already underway.
    fn warm_up(&mut self) {
        if self.warming_up {
            return;
        }
        self.warming_up = true;

        let client = Arc::clone(&self.client);
        let fetched = self.fetched.clone();
        let limit = self.paging.config().total_items;
        tokio::spawn(
            async move {
                let result = client.fetch_all(limit).await;
                let _ = fetched.send(Fetched::WarmUp(result));
            }
            .instrument(debug_span!("warm_up", limit)),
        );
    }

    fn publish(&self) {
        self.view.send_replace(CatalogView {
            items: self.visible.clone(),
            query: self.search.query().to_string(),
            is_loading: self.paging.is_loading(),
            error: self.paging.last_error().map(str::to_string),
            current_page: self.paging.current_page(),
            total_pages: self.paging.total_pages(),
            cached: self.cache.len(),
            warming_up: self.warming_up,
        });
    }
}
