//! Rendering of listings and detail records for the terminal and as JSON.

use std::fmt::{self, Display};

use pokedex_catalog::{AssetUrls, CatalogItem, ItemDetail};
use serde::Serialize;

/// A listed species together with the URLs of its assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub model_url: String,
}

impl DisplayItem {
    fn new(item: &CatalogItem, assets: &AssetUrls) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            image_url: item.image_url(assets),
            model_url: item.model_url(assets),
        }
    }
}

impl Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}  {}", self.id, self.name)
    }
}

/// The species to show, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayItems(Vec<DisplayItem>);

impl DisplayItems {
    pub fn new(items: &[CatalogItem], assets: &AssetUrls) -> Self {
        Self(items.iter().map(|item| DisplayItem::new(item, assets)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self)
    }
}

impl Display for DisplayItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = self.0.iter().peekable();
        while let Some(item) = items.next() {
            write!(f, "{item}")?;
            // Only print a newline if there are more items to print
            if items.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// A detail record with converted units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDetail {
    pub id: u32,
    pub name: String,
    pub height_m: f64,
    pub weight_kg: f64,
    /// Type names ordered by slot
    pub types: Vec<String>,
    pub stats: Vec<DisplayStat>,
    pub image_url: String,
    pub model_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayStat {
    pub name: String,
    pub base: u32,
    pub effort: u32,
}

impl DisplayDetail {
    pub fn new(detail: &ItemDetail, assets: &AssetUrls) -> Self {
        let mut types = detail.types.clone();
        types.sort_by_key(|slot| slot.slot);

        Self {
            id: detail.id,
            name: pokedex_catalog::types::capitalize(&detail.name),
            height_m: detail.height_metres(),
            weight_kg: detail.weight_kilograms(),
            types: types.into_iter().map(|slot| slot.type_name).collect(),
            stats: detail
                .stats
                .iter()
                .map(|stat| DisplayStat {
                    name: stat.stat_name.clone(),
                    base: stat.base_stat,
                    effort: stat.effort,
                })
                .collect(),
            image_url: assets.image_url(detail.id),
            model_url: assets.model_url(detail.id),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self)
    }
}

impl Display for DisplayDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{:03} {}", self.id, self.name)?;
        writeln!(f, "Height: {:.1} m", self.height_m)?;
        writeln!(f, "Weight: {:.1} kg", self.weight_kg)?;
        write!(f, "Types:  {}", self.types.join(", "))?;

        let column_width = self
            .stats
            .iter()
            .map(|stat| stat.name.len())
            .max()
            .unwrap_or_default();
        for stat in &self.stats {
            writeln!(f)?;
            write!(f, "{:<column_width$}  {:>3}", stat.name, stat.base)?;
            if stat.effort > 0 {
                write!(f, "  (+{} EV)", stat.effort)?;
            }
        }
        Ok(())
    }
}
