use std::sync::Arc;

use anyhow::{bail, Result};
use bpaf::Bpaf;
use pokedex_catalog::Client;
use pokedex_core::{DetailLoader, DetailState};
use tracing::instrument;

use crate::config::Config;
use crate::utils::display::DisplayDetail;

// Show detailed information about a single species
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the detail record as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Catalog number of the species, e.g. 25 for Pikachu
    #[bpaf(positional("id"))]
    pub id: u32,
}

impl Show {
    #[instrument(name = "show", fields(id = self.id, json = self.json), skip_all)]
    pub async fn handle(self, config: Config, client: Arc<Client>) -> Result<()> {
        let total_items = config.paging_config().total_items;
        if !(1..=total_items).contains(&self.id) {
            bail!("no species with id {}, ids go from 1 to {total_items}", self.id);
        }

        let loader = DetailLoader::new(client);
        let detail = match loader.load(self.id).await {
            DetailState::Loaded(detail) => detail,
            DetailState::Failed { id, message } => {
                bail!("could not load species {id}: {message}")
            },
            state => bail!("detail of species {} did not load: {state:?}", self.id),
        };

        let detail = DisplayDetail::new(&detail, &config.assets());
        if self.json {
            println!("{}", detail.to_json()?);
        } else {
            println!("{detail}");
        }
        Ok(())
    }
}
