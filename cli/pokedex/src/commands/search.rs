use std::sync::Arc;

use anyhow::{anyhow, Result};
use bpaf::Bpaf;
use pokedex_catalog::Client;
use pokedex_core::CatalogHandle;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::utils::display::DisplayItems;
use crate::utils::message;

// Search species by name
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    /// Display search results as a JSON array
    #[bpaf(long)]
    pub json: bool,

    /// Part of the species name to look for, case is ignored.
    ///
    /// An empty query lists the first page.
    #[bpaf(positional("query"))]
    pub query: String,
}

impl Search {
    #[instrument(name = "search", fields(json = self.json, query = self.query), skip_all)]
    pub async fn handle(self, config: Config, client: Arc<Client>) -> Result<()> {
        let paging = config.paging_config();
        let catalog = CatalogHandle::spawn(client, paging);

        // the first page kicks off loading the whole catalog
        catalog.load_first_page().await?;
        let loaded = catalog
            .wait_for(|view| !view.is_loading && !view.warming_up)
            .await?;
        if let Some(error) = loaded.error {
            return Err(anyhow!(error).context("could not load the catalog"));
        }
        debug!(cached = loaded.cached, "catalog loaded");

        catalog.search(self.query.as_str()).await?;
        let view = catalog.view();

        if view.cached < paging.total_items as usize && !self.query.is_empty() {
            message::warning(format!(
                "Only {} of {} species could be searched, results may be incomplete.",
                view.cached, paging.total_items
            ));
        }

        let items = DisplayItems::new(&view.items, &config.assets());
        if self.json {
            println!("{}", items.to_json()?);
            return Ok(());
        }

        if items.is_empty() {
            message::plain(format!("No species matched '{}'.", self.query));
            return Ok(());
        }
        println!("{items}");
        Ok(())
    }
}
