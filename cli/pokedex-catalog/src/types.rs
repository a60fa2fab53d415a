//! Catalog interaction types.
//!
//! The wire types mirror the PokéAPI payloads as they arrive,
//! the domain types are what the rest of the workspace consumes.

use serde::{Deserialize, Serialize};

use crate::config::AssetUrls;
use crate::error::CatalogClientError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `GET /pokemon?offset=..&limit=..`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PageEntry>,
}

/// A single entry of a [`PageResponse`].
///
/// The API does not include an id here; ids are derived from the request offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub name: String,
    pub url: String,
}

/// A `{name, url}` reference to another API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Body of `GET /pokemon/{id}`, restricted to the fields we use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailResponse {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<DetailTypeSlot>,
    pub stats: Vec<DetailStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailTypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub type_info: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailStat {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResource,
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// One species in the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// 1-based position in the catalog, derived from the request offset.
    pub id: u32,
    /// Display name, capitalized.
    pub name: String,
    /// Detail resource URL as returned by the API.
    pub source_url: String,
}

impl CatalogItem {
    /// PNG sprite of this species under `assets`.
    pub fn image_url(&self, assets: &AssetUrls) -> String {
        assets.image_url(self.id)
    }

    /// GLB model of this species under `assets`.
    pub fn model_url(&self, assets: &AssetUrls) -> String {
        assets.model_url(self.id)
    }
}

/// Map the entries of a page requested at `offset` to catalog items.
///
/// The id of every entry is `offset + index + 1`, whatever the server put in its url.
/// Fails if an id would not fit in a `u32`.
pub fn items_from_page(
    offset: u32,
    entries: Vec<PageEntry>,
) -> Result<Vec<CatalogItem>, CatalogClientError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = u32::try_from(index)
                .ok()
                .and_then(|index| offset.checked_add(index)?.checked_add(1))
                .ok_or_else(|| {
                    CatalogClientError::InvalidRequest(format!(
                        "entry {index} of the page at offset {offset} has no representable id"
                    ))
                })?;
            Ok(CatalogItem {
                id,
                name: capitalize(&entry.name),
                source_url: entry.url,
            })
        })
        .collect()
}

/// Uppercase the first letter of every word and lowercase the rest.
///
/// Any character that is not alphanumeric separates words,
/// so `nidoran-f` becomes `Nidoran-F`.
pub fn capitalize(name: &str) -> String {
    let mut capitalized = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            at_word_start = true;
            capitalized.push(c);
        } else if at_word_start {
            at_word_start = false;
            capitalized.extend(c.to_uppercase());
        } else {
            capitalized.extend(c.to_lowercase());
        }
    }
    capitalized
}

/// Extended per-species data, fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: u32,
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatValue>,
}

impl ItemDetail {
    pub fn height_metres(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kilograms(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u32,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub stat_name: String,
    pub base_stat: u32,
    pub effort: u32,
}

impl From<DetailResponse> for ItemDetail {
    fn from(response: DetailResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
            height: response.height,
            weight: response.weight,
            types: response
                .types
                .into_iter()
                .map(|slot| TypeSlot {
                    slot: slot.slot,
                    type_name: slot.type_info.name,
                })
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|stat| StatValue {
                    stat_name: stat.stat.name,
                    base_stat: stat.base_stat,
                    effort: stat.effort,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn entry(name: &str) -> PageEntry {
        PageEntry {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{name}/"),
        }
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize("bulbasaur"), "Bulbasaur");
        assert_eq!(capitalize("MEW"), "Mew");
        assert_eq!(capitalize("mr mime"), "Mr Mime");
        assert_eq!(capitalize("nidoran-f"), "Nidoran-F");
        assert_eq!(capitalize("mr-mime"), "Mr-Mime");
        assert_eq!(capitalize("porygon2"), "Porygon2");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn ids_are_positional() {
        let items = items_from_page(40, vec![entry("zubat"), entry("golbat")]).unwrap();
        assert_eq!(items, vec![
            CatalogItem {
                id: 41,
                name: "Zubat".to_string(),
                source_url: "https://pokeapi.co/api/v2/pokemon/zubat/".to_string(),
            },
            CatalogItem {
                id: 42,
                name: "Golbat".to_string(),
                source_url: "https://pokeapi.co/api/v2/pokemon/golbat/".to_string(),
            },
        ]);
    }

    #[test]
    fn derived_asset_urls() {
        let item = items_from_page(24, vec![entry("pikachu")]).unwrap().remove(0);
        let assets = AssetUrls::default();
        assert_eq!(
            item.image_url(&assets),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
        );
        assert_eq!(
            item.model_url(&assets),
            "https://raw.githubusercontent.com/Sudhanshu-Ambastha/Pokemon-3D/main/models/glb/regular/25.glb"
        );

        let mirror = AssetUrls {
            sprite_base_url: "https://sprites.example".to_string(),
            model_base_url: "https://models.example/".to_string(),
        };
        assert_eq!(item.image_url(&mirror), "https://sprites.example/25.png");
        assert_eq!(item.model_url(&mirror), "https://models.example/25.glb");
    }

    #[test]
    fn ids_past_u32_are_rejected() {
        let items = items_from_page(u32::MAX - 2, vec![entry("a"), entry("b")]).unwrap();
        assert_eq!(items.last().map(|item| item.id), Some(u32::MAX));

        let err = items_from_page(u32::MAX - 1, vec![entry("a"), entry("b")]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidRequest);
    }

    #[test]
    fn detail_maps_snake_case_base_stat() {
        let response: DetailResponse = serde_json::from_value(json!({
            "id": 4,
            "name": "charmander",
            "height": 6,
            "weight": 85,
            "base_experience": 62,
            "types": [
                { "slot": 1, "type": { "name": "fire", "url": "https://pokeapi.co/api/v2/type/10/" } }
            ],
            "stats": [
                { "base_stat": 39, "effort": 0, "stat": { "name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/" } },
                { "base_stat": 65, "effort": 1, "stat": { "name": "speed", "url": "https://pokeapi.co/api/v2/stat/6/" } }
            ]
        }))
        .unwrap();

        let detail = ItemDetail::from(response);
        assert_eq!(detail.types, vec![TypeSlot {
            slot: 1,
            type_name: "fire".to_string()
        }]);
        assert_eq!(detail.stats[1], StatValue {
            stat_name: "speed".to_string(),
            base_stat: 65,
            effort: 1,
        });
        assert_eq!(detail.height_metres(), 0.6);
        assert_eq!(detail.weight_kilograms(), 8.5);
    }

    proptest! {
        #[test]
        fn ids_increase_from_offset(offset in 0..10_000_u32, names in proptest::collection::vec("[a-z]{1,12}", 0..30)) {
            let entries = names.iter().map(|name| entry(name)).collect::<Vec<_>>();
            let items = items_from_page(offset, entries).unwrap();
            prop_assert_eq!(items.len(), names.len());
            for (index, item) in items.iter().enumerate() {
                prop_assert_eq!(item.id, offset + index as u32 + 1);
            }
        }
    }
}
