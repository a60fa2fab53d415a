//! Configuration types for catalog client construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base URL of the public PokéAPI.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
const DEFAULT_MODEL_BASE_URL: &str =
    "https://raw.githubusercontent.com/Sudhanshu-Ambastha/Pokemon-3D/main/models/glb/regular";

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API, without the `/pokemon` resource.
    pub base_url: String,
    /// Optional `User-Agent` sent with every request.
    pub user_agent: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Where sprite and 3D assets are served from.
    pub assets: AssetUrls,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            assets: AssetUrls::default(),
        }
    }
}

/// Locations of the per-species assets.
///
/// Asset URLs are a pure function of the positional species id,
/// so nothing here is fetched by the client itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUrls {
    pub sprite_base_url: String,
    pub model_base_url: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self {
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            model_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
        }
    }
}

impl AssetUrls {
    /// PNG sprite for the species with `id`.
    pub fn image_url(&self, id: u32) -> String {
        format!("{}/{id}.png", self.sprite_base_url.trim_end_matches('/'))
    }

    /// GLB model for the species with `id`.
    pub fn model_url(&self, id: u32) -> String {
        format!("{}/{id}.glb", self.model_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_urls_ignore_trailing_slash() {
        let assets = AssetUrls {
            sprite_base_url: "https://sprites.example/".to_string(),
            model_base_url: "https://models.example".to_string(),
        };
        assert_eq!(assets.image_url(25), "https://sprites.example/25.png");
        assert_eq!(assets.model_url(25), "https://models.example/25.glb");
    }
}
