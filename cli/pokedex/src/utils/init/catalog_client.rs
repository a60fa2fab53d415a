use std::path::PathBuf;

use anyhow::{bail, Context};
use pokedex_catalog::{CatalogClient, Client, MockClient, POKEDEX_CATALOG_MOCK_DATA_VAR};
use tracing::debug;

use crate::config::Config;

/// Initialize the catalog client
///
/// - Initialize a mock client if `_POKEDEX_USE_CATALOG_MOCK` is set to a path to mock data
/// - Initialize a real client otherwise
pub fn init_catalog_client(config: &Config) -> Result<Client, anyhow::Error> {
    if let Ok(path_str) = std::env::var(POKEDEX_CATALOG_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock catalog client");
        Ok(MockClient::from_file(&path)?.into())
    } else {
        let client_config = config.client_config();
        debug!(base_url = %client_config.base_url, "using catalog client");
        let client = CatalogClient::new(client_config).context("invalid catalog configuration")?;
        Ok(client.into())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn mock_client_from_env() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("mock.json");
        std::fs::write(
            &path,
            r#"{ "species": [{ "name": "bulbasaur", "url": "mock://pokemon/1" }] }"#,
        )
        .unwrap();

        let client = temp_env::with_var(
            POKEDEX_CATALOG_MOCK_DATA_VAR,
            Some(path.as_os_str()),
            || init_catalog_client(&Config::default()),
        )
        .unwrap();
        assert!(matches!(client, Client::Mock(_)));
    }

    #[test]
    #[serial]
    fn missing_mock_file_is_an_error() {
        let result = temp_env::with_var(
            POKEDEX_CATALOG_MOCK_DATA_VAR,
            Some("/does/not/exist.json"),
            || init_catalog_client(&Config::default()),
        );
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn http_client_by_default() {
        let client = temp_env::with_var_unset(POKEDEX_CATALOG_MOCK_DATA_VAR, || {
            init_catalog_client(&Config::default())
        })
        .unwrap();
        assert!(matches!(client, Client::Catalog(_)));
    }

    #[test]
    #[serial]
    fn invalid_base_url_is_an_error() {
        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();
        let result = temp_env::with_var_unset(POKEDEX_CATALOG_MOCK_DATA_VAR, || {
            init_catalog_client(&config)
        });
        assert!(result.is_err());
    }
}
