use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::recipe::GenerationConstraints;
use crate::recipe_generator::{GenerationResponse, RecipeGenerationService};
use crate::saved_recipes::SavedRecipesStore;

/// Runs one generation and writes its response envelope to `out` as pretty JSON.
///
/// A failed generation is reported only through the envelope, so it comes back as
/// `Ok` with `success: false`. `Err` is left for I/O and store problems.
pub async fn run_generate<W: Write>(
    service: &RecipeGenerationService,
    constraints: &GenerationConstraints,
    save_to: Option<&Path>,
    out: &mut W,
) -> Result<GenerationResponse> {
    let response = service.generate_response(constraints).await;
    let rendered = serde_json::to_string_pretty(&response).context("Failed to render JSON")?;
    writeln!(out, "{}", rendered).context("Failed to write generation result")?;

    if let (Some(path), Some(recipe)) = (save_to, response.recipe()) {
        let mut store = SavedRecipesStore::load(path).await?;
        store.save(recipe.clone()).await?;
        tracing::info!(path = ?store.path(), "Generated recipe saved");
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_invoker::FakeInvoker;
    use crate::recipe::{Region, Season};
    use std::sync::Arc;

    const REPLY: &str = r#"{"title":"Brezn","description":"Soft pretzels","ingredients":[{"name":"Salt","quantity":1,"unit":"tsp"}],"instructions":["Stir"]}"#;

    fn constraints() -> GenerationConstraints {
        GenerationConstraints::new(Region::Bavaria, Season::Spring)
    }

    #[tokio::test]
    async fn test_failure_is_written_once_and_not_raised() {
        let service = RecipeGenerationService::new(Arc::new(FakeInvoker::with_response("not json at all")));
        let mut out = Vec::new();

        let response = run_generate(&service, &constraints(), None, &mut out).await.unwrap();

        assert!(!response.is_success());
        let printed = String::from_utf8(out).unwrap();
        let envelope: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(envelope["success"], false);
        assert_eq!(printed.matches("Failed to generate recipe").count(), 1);
    }

    #[tokio::test]
    async fn test_success_is_written_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let service = RecipeGenerationService::new(Arc::new(FakeInvoker::with_response(REPLY)));
        let mut out = Vec::new();

        let response = run_generate(&service, &constraints(), Some(path.as_path()), &mut out).await.unwrap();

        let envelope: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(envelope["recipe"]["title"], "Brezn");
        let store = SavedRecipesStore::load(&path).await.unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(Some(&store.list()[0]), response.recipe());
    }

    #[tokio::test]
    async fn test_failure_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let service = RecipeGenerationService::new(Arc::new(FakeInvoker::without_content()));

        run_generate(&service, &constraints(), Some(path.as_path()), &mut Vec::<u8>::new()).await.unwrap();

        assert!(!path.exists());
    }
}
