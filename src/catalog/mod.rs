pub mod data_loader;

pub use data_loader::{load_catalog_recipes, CatalogError, BUILTIN_RECIPES_JSON};

use chrono::Datelike;
use rand::seq::SliceRandom;

use crate::recipe::{Recipe, Region, Season};

/// The fixed, authored set of recipes and the deterministic queries over it.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_RECIPES_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let recipes = load_catalog_recipes(json)?;
        tracing::debug!(count = recipes.len(), "Recipe catalog loaded");
        Ok(Self { recipes })
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn list_by_season(&self, season: Season) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.season == season).collect()
    }

    pub fn list_by_region(&self, region: Region) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.region == region).collect()
    }

    pub fn list_by_season_and_region(&self, season: Season, region: Region) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.season == season && r.region == region)
            .collect()
    }

    pub fn random_recipe(&self) -> Option<&Recipe> {
        self.recipes.choose(&mut rand::thread_rng())
    }

    pub fn random_by_season(&self, season: Season) -> Option<&Recipe> {
        self.list_by_season(season)
            .choose(&mut rand::thread_rng())
            .copied()
    }

    /// A random recipe for the pair, or `None` when the catalog has nothing for it.
    pub fn random_pick(&self, season: Season, region: Region) -> Option<&Recipe> {
        self.list_by_season_and_region(season, region)
            .choose(&mut rand::thread_rng())
            .copied()
    }
}

pub fn regions() -> &'static [Region] {
    Region::ALL
}

pub fn seasons() -> &'static [Season] {
    Season::ALL
}

/// Season for a 0-indexed calendar month (0 = January).
pub fn season_for_month(month0: u32) -> Season {
    match month0 {
        2..=4 => Season::Spring,
        5..=7 => Season::Summer,
        8..=10 => Season::Autumn,
        _ => Season::Winter,
    }
}

pub fn current_season() -> Season {
    season_for_month(chrono::Local::now().month0())
}
