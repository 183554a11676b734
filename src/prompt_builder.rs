use crate::recipe::{Difficulty, GenerationConstraints, Region, Season};

pub const SYSTEM_MESSAGE: &str =
    "You are an expert German chef. Generate authentic German recipes in JSON format.";

pub const MIN_REQUESTED_INGREDIENTS: usize = 8;
pub const MIN_REQUESTED_STEPS: usize = 6;

const RECIPE_JSON_SHAPE: &str = r#"{
  "title": "Recipe Name in German",
  "description": "Brief description of the dish and its cultural significance",
  "servings": 4,
  "prepTime": 20,
  "cookTime": 45,
  "ingredients": [
    {
      "name": "ingredient name",
      "quantity": 2,
      "unit": "tbsp"
    }
  ],
  "instructions": [
    "Step 1",
    "Step 2"
  ]
}"#;

pub fn build_recipe_prompt(
    region: Region,
    season: Season,
    dietary_restrictions: Option<&str>,
    cooking_level: Option<Difficulty>,
) -> String {
    let season_lower = season.label().to_lowercase();
    let difficulty = cooking_level.unwrap_or_default();

    let mut prompt = format!(
        "You are an expert German chef. Generate a unique, authentic {season_lower} recipe from the {region} region of Germany.\n\n"
    );

    // Blank restrictions are treated as none at all.
    if let Some(restrictions) = dietary_restrictions.map(str::trim).filter(|r| !r.is_empty()) {
        prompt.push_str(&format!("Dietary restrictions: {restrictions}\n"));
    }
    prompt.push_str(&format!("Difficulty level: {difficulty}\n\n"));

    prompt.push_str(
        "IMPORTANT: Return ONLY a valid JSON object (no markdown, no code blocks, no extra text) with this exact structure:\n",
    );
    prompt.push_str(RECIPE_JSON_SHAPE);
    prompt.push_str("\n\n");

    prompt.push_str(&format!(
        "Requirements:
- Use only seasonal ingredients available in {season_lower} in {region}
- Include at least {MIN_REQUESTED_INGREDIENTS} ingredients
- Include at least {MIN_REQUESTED_STEPS} cooking steps
- Make it authentically {region} German cuisine
- Include traditional cooking methods and flavors
- Ensure all measurements are realistic and practical
- The recipe should reflect {season} traditions and available produce"
    ));

    prompt
}

pub fn prompt_for(constraints: &GenerationConstraints) -> String {
    build_recipe_prompt(
        constraints.region,
        constraints.season,
        constraints.dietary_restrictions.as_deref(),
        constraints.cooking_level,
    )
}
