use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::recipe::Recipe;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Saved recipes I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Saved recipes file {path:?} is not valid: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The user's favorited recipes, persisted as a JSON array at a fixed path.
///
/// Every mutation rewrites the file, so what `list()` returns is what the next
/// `load()` will see.
#[derive(Debug)]
pub struct SavedRecipesStore {
    path: PathBuf,
    recipes: Vec<Recipe>,
}

impl SavedRecipesStore {
    /// Opens the store. A missing file is an empty store; an unreadable or corrupt one is an error.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let recipes = match fs::read_to_string(&path).await {
            Ok(data) if data.trim().is_empty() => Vec::new(),
            Ok(data) => serde_json::from_str(&data).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = ?path, count = recipes.len(), "Loaded saved recipes");
        Ok(Self { path, recipes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_saved(&self, recipe_id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == recipe_id)
    }

    /// Saves a recipe. Returns `false` if one with the same id was already saved.
    pub async fn save(&mut self, recipe: Recipe) -> Result<bool, StoreError> {
        if self.is_saved(&recipe.id) {
            return Ok(false);
        }
        tracing::info!(id = %recipe.id, title = %recipe.title, "Saving recipe");
        self.recipes.push(recipe);
        self.persist().await?;
        Ok(true)
    }

    /// Removes a recipe by id. Returns `false` if nothing was saved under that id.
    pub async fn remove(&mut self, recipe_id: &str) -> Result<bool, StoreError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != recipe_id);
        if self.recipes.len() == before {
            return Ok(false);
        }
        tracing::info!(id = %recipe_id, "Removed saved recipe");
        self.persist().await?;
        Ok(true)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.recipes).map_err(|source| {
            StoreError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Write-then-rename so a crash never leaves a half-written file behind.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).await.map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecipeCatalog;

    fn sample(id: &str) -> Recipe {
        let catalog = RecipeCatalog::builtin().unwrap();
        let mut recipe = catalog.all()[0].clone();
        recipe.id = id.to_string();
        recipe
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedRecipesStore::load(dir.path().join("saved.json")).await.unwrap();
        assert!(store.list().is_empty());
        assert!(!store.is_saved("anything"));
    }

    #[tokio::test]
    async fn test_save_remove_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("saved.json");

        let mut store = SavedRecipesStore::load(&path).await.unwrap();
        assert!(store.save(sample("a")).await.unwrap());
        assert!(store.save(sample("b")).await.unwrap());
        assert!(!store.save(sample("a")).await.unwrap(), "duplicate ids are not stored twice");
        assert!(store.is_saved("a"));

        let reloaded = SavedRecipesStore::load(&path).await.unwrap();
        let ids: Vec<&str> = reloaded.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
        let reloaded = SavedRecipesStore::load(&path).await.unwrap();
        assert!(!reloaded.is_saved("a"));
        assert!(reloaded.is_saved("b"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        std::fs::write(&path, "{not a list").unwrap();
        let err = SavedRecipesStore::load(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_generated_recipes_keep_their_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let mut generated = sample("ai-1-abcdefghi");
        generated.is_ai_generated = true;

        let mut store = SavedRecipesStore::load(&path).await.unwrap();
        store.save(generated).await.unwrap();

        let reloaded = SavedRecipesStore::load(&path).await.unwrap();
        assert!(reloaded.list()[0].is_ai_generated);
    }
}
