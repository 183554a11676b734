use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejection of a label that is not part of one of the fixed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

// Region, Season and Difficulty all share the same label handling: serde, Display
// and FromStr use the exact English label and nothing else.
macro_rules! labelled_enum {
    ($name:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label() == s)
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

labelled_enum!(Region, "region", [Bavaria, Rhineland, Northern, Swabia, Central]);
labelled_enum!(Season, "season", [Spring, Summer, Autumn, Winter]);
labelled_enum!(Difficulty, "difficulty", [Easy, Medium, Hard]);

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// How much of an ingredient. Models do not always answer with a number, so text
/// ("a pinch") and an explicit `null` are kept rather than rejected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Quantity {
    Amount(f64),
    Text(String),
    Unspecified,
}

impl Quantity {
    /// Reads a model-supplied quantity. Numeric and simple fraction strings ("2", "1/2")
    /// become amounts.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Quantity::Unspecified,
            Value::Number(n) => n.as_f64().map_or_else(|| Quantity::Text(n.to_string()), Quantity::Amount),
            Value::String(s) => parse_amount(s).map_or_else(|| Quantity::Text(s.trim().to_string()), Quantity::Amount),
            other => Quantity::Text(other.to_string()),
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Quantity::Amount(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl From<f64> for Quantity {
    fn from(amount: f64) -> Self {
        Quantity::Amount(amount)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Amount(amount) => write!(f, "{}", amount),
            Quantity::Text(text) => f.write_str(text),
            Quantity::Unspecified => Ok(()),
        }
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(amount) = text.parse::<f64>() {
        return amount.is_finite().then_some(amount);
    }
    let (numerator, denominator) = text.split_once('/')?;
    let numerator = numerator.trim().parse::<f64>().ok()?;
    let denominator = denominator.trim().parse::<f64>().ok()?;
    (denominator != 0.0).then(|| numerator / denominator)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

/// A recipe as shown to the user, either authored in the catalog or produced by the model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub region: Region,
    pub season: Season,
    pub description: String,
    pub servings: i64,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: Difficulty,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(
        rename = "isAIGenerated",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_ai_generated: bool,
}

/// Recipes coming out of the generation pipeline carry `is_ai_generated == true`.
pub type GeneratedRecipe = Recipe;

/// The user's choices driving a generation call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConstraints {
    pub region: Region,
    pub season: Season,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_level: Option<Difficulty>,
}

impl GenerationConstraints {
    pub fn new(region: Region, season: Season) -> Self {
        Self {
            region,
            season,
            dietary_restrictions: None,
            cooking_level: None,
        }
    }

    pub fn with_dietary_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.dietary_restrictions = Some(restrictions.into());
        self
    }

    pub fn with_cooking_level(mut self, level: Difficulty) -> Self {
        self.cooking_level = Some(level);
        self
    }

    /// Requested difficulty, `Medium` when the caller left it open.
    pub fn difficulty(&self) -> Difficulty {
        self.cooking_level.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for region in Region::ALL {
            assert_eq!(region.label().parse::<Region>().unwrap(), *region);
        }
        for season in Season::ALL {
            assert_eq!(season.to_string().parse::<Season>().unwrap(), *season);
        }
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_unknown_labels_are_rejected() {
        let err = "InvalidRegion".parse::<Region>().unwrap_err();
        assert_eq!(err.kind, "region");
        assert!(err.to_string().contains("Bavaria, Rhineland, Northern, Swabia, Central"));
        assert!("winter".parse::<Season>().is_err());
        assert!("VeryHard".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_constraints_deserialize_from_request_shape() {
        let constraints: GenerationConstraints = serde_json::from_str(
            r#"{"region":"Bavaria","season":"Winter","dietaryRestrictions":"vegetarian","cookingLevel":"Easy"}"#,
        )
        .unwrap();
        assert_eq!(constraints.region, Region::Bavaria);
        assert_eq!(constraints.season, Season::Winter);
        assert_eq!(constraints.dietary_restrictions.as_deref(), Some("vegetarian"));
        assert_eq!(constraints.difficulty(), Difficulty::Easy);

        let bad = serde_json::from_str::<GenerationConstraints>(
            r#"{"region":"Bavaria","season":"Winter","cookingLevel":"VeryHard"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_difficulty_defaults_to_medium() {
        let constraints = GenerationConstraints::new(Region::Swabia, Season::Spring);
        assert_eq!(constraints.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_quantity_from_model_json() {
        use serde_json::json;

        assert_eq!(Quantity::from_json(&json!(1.5)), Quantity::Amount(1.5));
        assert_eq!(Quantity::from_json(&json!(0)), Quantity::Amount(0.0));
        assert_eq!(Quantity::from_json(&json!("2")), Quantity::Amount(2.0));
        assert_eq!(Quantity::from_json(&json!("1/2")), Quantity::Amount(0.5));
        assert_eq!(Quantity::from_json(&json!("1/0")), Quantity::Text("1/0".to_string()));
        assert_eq!(Quantity::from_json(&json!(" a pinch ")), Quantity::Text("a pinch".to_string()));
        assert_eq!(Quantity::from_json(&json!(null)), Quantity::Unspecified);
    }

    #[test]
    fn test_quantity_wire_shape() {
        let ingredients: Vec<Ingredient> = serde_json::from_str(
            r#"[{"name":"Flour","quantity":200,"unit":"g"},
                {"name":"Salt","quantity":"a pinch","unit":"pinch"},
                {"name":"Pepper","quantity":null,"unit":"to taste"}]"#,
        )
        .unwrap();
        assert_eq!(ingredients[0].quantity, Quantity::Amount(200.0));
        assert_eq!(ingredients[1].quantity, Quantity::Text("a pinch".to_string()));
        assert_eq!(ingredients[2].quantity, Quantity::Unspecified);

        let value = serde_json::to_value(&ingredients).unwrap();
        assert_eq!(value[0]["quantity"], 200.0);
        assert_eq!(value[1]["quantity"], "a pinch");
        assert!(value[2]["quantity"].is_null());
        assert_eq!(ingredients[1].quantity.to_string(), "a pinch");
        assert_eq!(Quantity::Amount(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_catalog_recipe_omits_ai_flag() {
        let recipe = Recipe {
            id: "spring-bavaria-1".to_string(),
            title: "Spargel".to_string(),
            region: Region::Bavaria,
            season: Season::Spring,
            description: "Asparagus".to_string(),
            servings: 4,
            prep_time: 15,
            cook_time: 20,
            difficulty: Difficulty::Medium,
            ingredients: vec![Ingredient {
                name: "White asparagus".to_string(),
                quantity: Quantity::Amount(1.5),
                unit: "kg".to_string(),
            }],
            instructions: vec!["Peel".to_string()],
            is_ai_generated: false,
        };
        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("isAIGenerated").is_none());
        assert_eq!(value["prepTime"], 15);
    }
}
