use std::collections::BTreeMap;
use std::env;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use pokedex_catalog::{AssetUrls, CatalogClientConfig, DEFAULT_BASE_URL};
use pokedex_core::PagingConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the pokedex config directory
const POKEDEX_DIR_NAME: &str = "pokedex";
const POKEDEX_CONFIG_DIR_VAR: &str = "POKEDEX_CONFIG_DIR";
pub const POKEDEX_CONFIG_FILE: &str = "pokedex.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where and how to reach the catalog
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// How the catalog is split into pages
    #[serde(default)]
    pub paging: PagingSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// The URL of the catalog API, up to and excluding `/pokemon`
    pub base_url: String,
    /// `User-Agent` sent with every request (default: `pokedex/<version>`)
    pub user_agent: Option<String>,
    /// Additional headers sent with every request
    pub extra_headers: BTreeMap<String, String>,
    /// Base URL of the PNG sprites
    pub sprite_base_url: String,
    /// Base URL of the GLB models
    pub model_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let assets = AssetUrls::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            sprite_base_url: assets.sprite_base_url,
            model_base_url: assets.model_base_url,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingSettings {
    /// Number of species on a page
    pub page_size: NonZeroU32,
    /// Number of species in the catalog
    pub total_items: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        let PagingConfig {
            page_size,
            total_items,
        } = PagingConfig::default();
        Self {
            page_size,
            total_items,
        }
    }
}

impl Config {
    /// Creates a [Config] from the config file and the environment
    ///
    /// The config file is read from `$POKEDEX_CONFIG_DIR/pokedex.toml`,
    /// falling back to the platform config directory.
    /// `POKEDEX_<SECTION>__<KEY>` variables override values from the file.
    pub fn parse() -> Result<Config> {
        let config_dir = match env::var(POKEDEX_CONFIG_DIR_VAR) {
            Ok(v) => {
                debug!("`${POKEDEX_CONFIG_DIR_VAR}` set: {v}");
                Some(PathBuf::from(v))
            },
            Err(_) => {
                let config_dir = dirs::config_dir().map(|dir| dir.join(POKEDEX_DIR_NAME));
                debug!("`${POKEDEX_CONFIG_DIR_VAR}` not set, using {config_dir:?}");
                config_dir
            },
        };

        Self::read(config_dir.as_deref())
    }

    fn read(config_dir: Option<&Path>) -> Result<Config> {
        let mut builder = HierarchicalConfig::builder();

        if let Some(config_dir) = config_dir {
            builder = builder.add_source(
                config::File::from(config_dir.join(POKEDEX_CONFIG_FILE))
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        // override via env variables
        let builder = builder.add_source(
            Environment::with_prefix("POKEDEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("Could not parse config")?;
        Ok(config)
    }

    pub fn client_config(&self) -> CatalogClientConfig {
        let user_agent = self
            .catalog
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("pokedex/{}", env!("CARGO_PKG_VERSION")));

        CatalogClientConfig {
            base_url: self.catalog.base_url.clone(),
            user_agent: Some(user_agent),
            extra_headers: self.catalog.extra_headers.clone(),
            assets: self.assets(),
        }
    }

    pub fn assets(&self) -> AssetUrls {
        AssetUrls {
            sprite_base_url: self.catalog.sprite_base_url.clone(),
            model_base_url: self.catalog.model_base_url.clone(),
        }
    }

    pub fn paging_config(&self) -> PagingConfig {
        PagingConfig {
            page_size: self.paging.page_size,
            total_items: self.paging.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn defaults_without_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let config = temp_env::with_var_unset("POKEDEX_PAGING__PAGE_SIZE", || {
            Config::read(Some(tempdir.path())).unwrap()
        });
        assert_eq!(config, Config::default());
        assert_eq!(config.paging_config(), PagingConfig::default());
        assert_eq!(config.client_config().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    #[serial]
    fn reads_config_file() {
        let tempdir = tempfile::tempdir().unwrap();
        std::fs::write(
            tempdir.path().join(POKEDEX_CONFIG_FILE),
            indoc! {r#"
                [catalog]
                base_url = "http://localhost:8080/api/v2"
                user_agent = "pokedex-test"

                [catalog.extra_headers]
                x-trainer = "ash"

                [paging]
                page_size = 10
            "#},
        )
        .unwrap();

        let config = Config::read(Some(tempdir.path())).unwrap();
        let client_config = config.client_config();
        assert_eq!(client_config.base_url, "http://localhost:8080/api/v2");
        assert_eq!(client_config.user_agent.as_deref(), Some("pokedex-test"));
        assert_eq!(
            client_config.extra_headers.get("x-trainer").map(String::as_str),
            Some("ash")
        );
        assert_eq!(client_config.assets, AssetUrls::default());
        assert_eq!(config.paging.page_size.get(), 10);
        assert_eq!(config.paging.total_items, 151);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let tempdir = tempfile::tempdir().unwrap();
        std::fs::write(
            tempdir.path().join(POKEDEX_CONFIG_FILE),
            indoc! {r#"
                [paging]
                page_size = 10
            "#},
        )
        .unwrap();

        temp_env::with_vars(
            [
                (
                    POKEDEX_CONFIG_DIR_VAR,
                    Some(tempdir.path().as_os_str().to_string_lossy().as_ref()),
                ),
                ("POKEDEX_PAGING__PAGE_SIZE", Some("25")),
                ("POKEDEX_CATALOG__BASE_URL", Some("http://localhost:9000")),
            ],
            || {
                let config = Config::parse().unwrap();
                assert_eq!(config.paging.page_size.get(), 25);
                assert_eq!(config.catalog.base_url, "http://localhost:9000");
            },
        );
    }

    #[test]
    #[serial]
    fn rejects_zero_page_size() {
        temp_env::with_var("POKEDEX_PAGING__PAGE_SIZE", Some("0"), || {
            let tempdir = tempfile::tempdir().unwrap();
            assert!(Config::read(Some(tempdir.path())).is_err());
        });
    }
}
