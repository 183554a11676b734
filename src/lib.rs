pub mod api_connection;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod model_invoker;
pub mod prompt_builder;
pub mod recipe;
pub mod recipe_generator;
pub mod recipe_validator;
pub mod response_sanitizer;
pub mod saved_recipes;
