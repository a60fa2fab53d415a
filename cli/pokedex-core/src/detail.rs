//! On-demand detail records with their own loading and error state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pokedex_catalog::{CatalogApi, ItemDetail};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        id: u32,
    },
    Loaded(ItemDetail),
    Failed {
        id: u32,
        message: String,
    },
}

impl DetailState {
    /// The species this state is about, if any.
    pub fn id(&self) -> Option<u32> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading { id } | DetailState::Failed { id, .. } => Some(*id),
            DetailState::Loaded(detail) => Some(detail.id),
        }
    }
}

/// Loads detail records one species at a time.
///
/// Starting a new load supersedes the previous one; a superseded result is
/// returned to its caller but never published.
#[derive(Debug)]
pub struct DetailLoader<C> {
    client: Arc<C>,
    state: watch::Sender<DetailState>,
    generation: AtomicU64,
}

impl<C> DetailLoader<C>
where
    C: CatalogApi,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: watch::Sender::new(DetailState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Fetch the detail record of `id`.
    #[instrument(skip(self))]
    pub async fn load(&self, id: u32) -> DetailState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(DetailState::Loading { id });

        let next = match self.client.fetch_detail(id).await {
            Ok(detail) => DetailState::Loaded(detail),
            Err(err) => {
                warn!(kind = ?err.kind(), %err, "failed to load detail");
                DetailState::Failed {
                    id,
                    message: err.to_string(),
                }
            },
        };

        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next.clone();
            true
        });
        if !published {
            debug!("dropping superseded detail");
        }
        next
    }

    /// Load the species of the current state again.
    ///
    /// Returns `None` if nothing was ever loaded.
    pub async fn retry(&self) -> Option<DetailState> {
        let id = self.state.borrow().id()?;
        Some(self.load(id).await)
    }
}
