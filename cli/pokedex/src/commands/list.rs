use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use bpaf::Bpaf;
use pokedex_catalog::Client;
use pokedex_core::{CatalogHandle, WarmUp};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::utils::display::DisplayItems;
use crate::utils::message;

// List one page of the catalog
#[derive(Debug, Bpaf, Clone)]
pub struct List {
    /// Display the page as a JSON array
    #[bpaf(long)]
    pub json: bool,

    /// The page to show, starting at 1
    #[bpaf(long, short, argument("PAGE"), fallback(1))]
    pub page: u32,
}

impl List {
    #[instrument(name = "list", fields(page = self.page, json = self.json), skip_all)]
    pub async fn handle(self, config: Config, client: Arc<Client>) -> Result<()> {
        let paging = config.paging_config();
        let total_pages = paging.total_pages();
        if !(1..=total_pages).contains(&self.page) {
            bail!(
                "page {} does not exist, pages go from 1 to {total_pages}",
                self.page
            );
        }

        // a single page never needs the search cache
        let catalog = CatalogHandle::spawn_with(client, paging, WarmUp::Disabled);
        let started = match self.page {
            1 => catalog.load_first_page().await?,
            page => catalog.go_to_page(page).await?,
        };
        debug!(started, "requested page");

        let view = catalog.wait_until_idle().await?;
        if let Some(error) = view.error {
            return Err(anyhow!(error).context(format!("could not load page {}", self.page)));
        }

        let items = DisplayItems::new(&view.items, &config.assets());
        if self.json {
            println!("{}", items.to_json()?);
            return Ok(());
        }

        if items.is_empty() {
            message::plain(format!("page {} is empty", self.page));
            return Ok(());
        }
        println!("{items}");
        message::plain(format!(
            "Page {} of {}. Use 'pokedex list --page <PAGE>' to see other pages.",
            view.current_page, view.total_pages
        ));
        Ok(())
    }
}
