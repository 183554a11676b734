use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::api_connection::ApiConnectionError;
use crate::model_invoker::ModelInvoker;
use crate::prompt_builder::{prompt_for, SYSTEM_MESSAGE};
use crate::recipe::{GeneratedRecipe, GenerationConstraints, Recipe};
use crate::recipe_validator::{validate, StructureError, ValidatedContent};
use crate::response_sanitizer::sanitize;

const ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Every way a generation call can fail. The display form is the message shown to users.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to generate recipe: {0}")]
    Transport(#[from] ApiConnectionError),

    #[error("Failed to generate recipe: No content in LLM response")]
    NoContent,

    #[error("Failed to generate recipe: Invalid JSON in LLM response: {0}")]
    MalformedJson(String),

    #[error("Failed to generate recipe: Invalid recipe structure from LLM: {0}")]
    Structure(#[from] StructureError),
}

/// Outward shape of a generation call: exactly one of `recipe` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GenerationResponse {
    Success { success: SuccessFlag, recipe: GeneratedRecipe },
    Failure { success: FailureFlag, error: String },
}

/// Serializes as `true`; only exists so the `success` key cannot disagree with the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct SuccessFlag;

/// Serializes as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
pub struct FailureFlag;

impl From<SuccessFlag> for bool {
    fn from(_: SuccessFlag) -> bool {
        true
    }
}

impl TryFrom<bool> for SuccessFlag {
    type Error = &'static str;

    fn try_from(value: bool) -> Result<Self, Self::Error> {
        value.then_some(SuccessFlag).ok_or("expected success: true")
    }
}

impl From<FailureFlag> for bool {
    fn from(_: FailureFlag) -> bool {
        false
    }
}

impl TryFrom<bool> for FailureFlag {
    type Error = &'static str;

    fn try_from(value: bool) -> Result<Self, Self::Error> {
        (!value).then_some(FailureFlag).ok_or("expected success: false")
    }
}

impl GenerationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResponse::Success { .. })
    }

    pub fn recipe(&self) -> Option<&GeneratedRecipe> {
        match self {
            GenerationResponse::Success { recipe, .. } => Some(recipe),
            GenerationResponse::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationResponse::Success { .. } => None,
            GenerationResponse::Failure { error, .. } => Some(error),
        }
    }
}

impl From<Result<GeneratedRecipe, GenerationError>> for GenerationResponse {
    fn from(result: Result<GeneratedRecipe, GenerationError>) -> Self {
        match result {
            Ok(recipe) => GenerationResponse::Success {
                success: SuccessFlag,
                recipe,
            },
            Err(e) => GenerationResponse::Failure {
                success: FailureFlag,
                error: e.to_string(),
            },
        }
    }
}

/// Turns constraints into a validated recipe with one call to the model.
#[derive(Debug, Clone)]
pub struct RecipeGenerationService {
    invoker: Arc<dyn ModelInvoker>,
}

impl RecipeGenerationService {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    pub fn model_name(&self) -> &str {
        self.invoker.model_name()
    }

    pub async fn generate(
        &self,
        constraints: &GenerationConstraints,
    ) -> Result<GeneratedRecipe, GenerationError> {
        let result = self.run_pipeline(constraints).await;
        match &result {
            Ok(recipe) => tracing::info!(
                id = %recipe.id,
                title = %recipe.title,
                region = %constraints.region,
                season = %constraints.season,
                "Generated recipe"
            ),
            Err(e) => tracing::error!(region = %constraints.region, season = %constraints.season, "Recipe generation error: {}", e),
        }
        result
    }

    pub async fn generate_response(&self, constraints: &GenerationConstraints) -> GenerationResponse {
        self.generate(constraints).await.into()
    }

    async fn run_pipeline(
        &self,
        constraints: &GenerationConstraints,
    ) -> Result<GeneratedRecipe, GenerationError> {
        let prompt = prompt_for(constraints);

        let raw = self
            .invoker
            .invoke(SYSTEM_MESSAGE, &prompt)
            .await?
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::NoContent)?;
        tracing::debug!("Raw model response:\n---\n{}\n---", raw);

        let candidate = sanitize(&raw);
        let parsed: serde_json::Value = serde_json::from_str(&candidate).map_err(|e| {
            tracing::debug!("Sanitized content was not JSON: {}", candidate);
            GenerationError::MalformedJson(e.to_string())
        })?;

        let content = validate(&parsed)?;
        Ok(assemble(content, constraints, new_recipe_id()))
    }
}

/// Merges model content with the request. Region, season and difficulty always come
/// from the caller.
pub fn assemble(content: ValidatedContent, constraints: &GenerationConstraints, id: String) -> Recipe {
    Recipe {
        id,
        title: content.title,
        region: constraints.region,
        season: constraints.season,
        description: content.description,
        servings: content.servings,
        prep_time: content.prep_time,
        cook_time: content.cook_time,
        difficulty: constraints.difficulty(),
        ingredients: content.ingredients,
        instructions: content.instructions,
        is_ai_generated: true,
    }
}

/// `ai-<unix millis>-<9 random base-36 chars>`.
pub fn new_recipe_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("ai-{}-{}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_invoker::FakeInvoker;
    use crate::recipe::{Difficulty, Region, Season};
    use std::collections::HashSet;

    const MINIMAL: &str = r#"{"title":"Brezn","description":"Soft pretzels","ingredients":[{"name":"Salt","quantity":1,"unit":"tsp"}],"instructions":["Stir"]}"#;

    fn service(invoker: FakeInvoker) -> RecipeGenerationService {
        RecipeGenerationService::new(Arc::new(invoker))
    }

    #[test]
    fn test_recipe_id_format() {
        let id = new_recipe_id();
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "ai");
        assert!(parts[1].parse::<u128>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_recipe_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..500).map(|_| new_recipe_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[tokio::test]
    async fn test_minimal_payload_round_trip() {
        let constraints = GenerationConstraints::new(Region::Central, Season::Autumn);
        let recipe = service(FakeInvoker::with_response(MINIMAL))
            .generate(&constraints)
            .await
            .unwrap();
        assert_eq!((recipe.servings, recipe.prep_time, recipe.cook_time), (4, 20, 45));
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert!(recipe.is_ai_generated);
        assert!(recipe.id.starts_with("ai-"));
    }

    #[tokio::test]
    async fn test_no_content_is_reported() {
        let constraints = GenerationConstraints::new(Region::Bavaria, Season::Winter);
        let err = service(FakeInvoker::without_content())
            .generate(&constraints)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoContent));
        assert_eq!(err.to_string(), "Failed to generate recipe: No content in LLM response");
    }

    #[tokio::test]
    async fn test_empty_text_counts_as_no_content() {
        let constraints = GenerationConstraints::new(Region::Bavaria, Season::Winter);
        let err = service(FakeInvoker::with_response(""))
            .generate(&constraints)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoContent));
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        let constraints = GenerationConstraints::new(Region::Bavaria, Season::Winter);
        let response = service(FakeInvoker::failing(503, "upstream overloaded"))
            .generate_response(&constraints)
            .await;
        let error = response.error().unwrap();
        assert!(error.starts_with("Failed to generate recipe: "));
        assert!(error.contains("upstream overloaded"));
    }

    #[test]
    fn test_response_serializes_one_of_recipe_or_error() {
        let failure: GenerationResponse = Err(GenerationError::NoContent).into();
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("recipe").is_none());
        assert_eq!(value["error"], "Failed to generate recipe: No content in LLM response");

        let constraints = GenerationConstraints::new(Region::Northern, Season::Summer);
        let content = validate(&serde_json::from_str::<serde_json::Value>(MINIMAL).unwrap()).unwrap();
        let success: GenerationResponse = Ok(assemble(content, &constraints, "ai-1-abc".to_string())).into();
        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("error").is_none());
        assert_eq!(value["recipe"]["isAIGenerated"], true);
        assert_eq!(value["recipe"]["region"], "Northern");

        let back: GenerationResponse = serde_json::from_value(value).unwrap();
        assert!(back.is_success());
    }
}
