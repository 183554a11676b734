//! Schema check for the untyped JSON a model returns.
//!
//! The checks run in a fixed order and stop at the first failure. Only once a value
//! has passed all of them is it turned into typed [`ValidatedContent`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::recipe::{Ingredient, Quantity};

pub const DEFAULT_SERVINGS: i64 = 4;
pub const DEFAULT_PREP_TIME: i64 = 20;
pub const DEFAULT_COOK_TIME: i64 = 45;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("missing required field")]
    MissingField,

    #[error("ingredients must be an array")]
    IngredientsNotArray,

    #[error("instructions must be an array")]
    InstructionsNotArray,

    #[error("invalid ingredient structure")]
    InvalidIngredient,

    #[error("ingredients must not be empty")]
    NoIngredients,

    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Model-supplied part of a recipe. Region, season and difficulty are never read from
/// the model, so they do not appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedContent {
    pub title: String,
    pub description: String,
    pub servings: i64,
    pub prep_time: i64,
    pub cook_time: i64,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
}

pub fn validate(parsed: &Value) -> Result<ValidatedContent, StructureError> {
    let empty = Map::new();
    let object = parsed.as_object().unwrap_or(&empty);

    let title = object.get("title");
    let description = object.get("description");
    let ingredients = object.get("ingredients");
    let instructions = object.get("instructions");

    if ![title, description, ingredients, instructions]
        .into_iter()
        .all(|field| field.is_some_and(is_truthy))
    {
        return Err(StructureError::MissingField);
    }

    let ingredients = ingredients
        .and_then(Value::as_array)
        .ok_or(StructureError::IngredientsNotArray)?;
    let instructions = instructions
        .and_then(Value::as_array)
        .ok_or(StructureError::InstructionsNotArray)?;

    let ingredients = ingredients
        .iter()
        .map(validate_ingredient)
        .collect::<Result<Vec<_>, _>>()?;
    if ingredients.is_empty() {
        return Err(StructureError::NoIngredients);
    }

    Ok(ValidatedContent {
        title: text_field(title, "title")?,
        description: text_field(description, "description")?,
        servings: numeric_or_default(object.get("servings"), "servings", DEFAULT_SERVINGS)?,
        prep_time: numeric_or_default(object.get("prepTime"), "prepTime", DEFAULT_PREP_TIME)?,
        cook_time: numeric_or_default(object.get("cookTime"), "cookTime", DEFAULT_COOK_TIME)?,
        ingredients,
        instructions: instructions
            .iter()
            .map(|step| {
                step.as_str().map(str::to_string).ok_or(StructureError::WrongType {
                    field: "instructions",
                    expected: "a list of text steps",
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn validate_ingredient(value: &Value) -> Result<Ingredient, StructureError> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    // Any present quantity is kept, including zero, null and text. Only a missing key fails.
    let quantity = value.get("quantity").map(Quantity::from_json);
    let unit = value
        .get("unit")
        .and_then(Value::as_str)
        .filter(|unit| !unit.is_empty());

    match (name, quantity, unit) {
        (Some(name), Some(quantity), Some(unit)) => Ok(Ingredient {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        }),
        _ => Err(StructureError::InvalidIngredient),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_field(value: Option<&Value>, field: &'static str) -> Result<String, StructureError> {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StructureError::WrongType {
            field,
            expected: "text",
        })
}

// Absent, null and zero fall back to the default; any other number passes through as-is.
fn numeric_or_default(
    value: Option<&Value>,
    field: &'static str,
    default: i64,
) -> Result<i64, StructureError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => {
            let number = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .unwrap_or(default);
            Ok(if number == 0 { default } else { number })
        }
        Some(_) => Err(StructureError::WrongType {
            field,
            expected: "a number",
        }),
    }
}
