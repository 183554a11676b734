use std::collections::HashSet;
use thiserror::Error;

use crate::recipe::Recipe;

pub const BUILTIN_RECIPES_JSON: &str = include_str!("../../data/german_recipes.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate recipe id in catalog: {0}")]
    DuplicateId(String),

    #[error("Catalog recipe '{id}' is invalid: {reason}")]
    InvalidRecipe { id: String, reason: String },
}

/// Parses catalog JSON and checks the authoring rules every catalog entry must follow.
pub fn load_catalog_recipes(json: &str) -> Result<Vec<Recipe>, CatalogError> {
    let recipes: Vec<Recipe> = serde_json::from_str(json)?;

    let mut seen_ids = HashSet::new();
    for recipe in &recipes {
        if !seen_ids.insert(recipe.id.as_str()) {
            return Err(CatalogError::DuplicateId(recipe.id.clone()));
        }
        check_recipe(recipe).map_err(|reason| CatalogError::InvalidRecipe {
            id: recipe.id.clone(),
            reason: reason.to_string(),
        })?;
    }

    Ok(recipes)
}

// Unlike generated recipes, authored ones must have strictly positive numbers.
fn check_recipe(recipe: &Recipe) -> Result<(), &'static str> {
    if recipe.title.trim().is_empty() || recipe.description.trim().is_empty() {
        return Err("title and description must not be empty");
    }
    if recipe.servings <= 0 || recipe.prep_time <= 0 || recipe.cook_time <= 0 {
        return Err("servings, prepTime and cookTime must be positive");
    }
    if recipe.ingredients.is_empty() || recipe.instructions.is_empty() {
        return Err("ingredients and instructions must not be empty");
    }
    if recipe
        .ingredients
        .iter()
        .any(|i| i.name.is_empty() || i.unit.is_empty() || !i.quantity.amount().is_some_and(|q| q > 0.0))
    {
        return Err("every ingredient needs a name, a unit and a positive quantity");
    }
    if recipe.is_ai_generated {
        return Err("catalog recipes cannot be marked as AI generated");
    }
    Ok(())
}
