use anyhow::{anyhow, Context, Result};
use std::process::ExitCode;
use std::sync::Arc;

use saison_kueche::catalog::{current_season, RecipeCatalog};
use saison_kueche::cli::{parse_args, Command, SavedAction};
use saison_kueche::commands::run_generate;
use saison_kueche::config::AppConfig;
use saison_kueche::logging;
use saison_kueche::model_invoker::OpenRouterInvoker;
use saison_kueche::recipe::{GenerationConstraints, Recipe};
use saison_kueche::recipe_generator::RecipeGenerationService;
use saison_kueche::saved_recipes::SavedRecipesStore;

fn print_summary(recipe: &Recipe) {
    let marker = if recipe.is_ai_generated { " [AI]" } else { "" };
    println!(
        "{:<22} {:<28} {:<9} {:<7} {:>3}+{:<3} min  {}{}",
        recipe.id,
        recipe.title,
        recipe.region,
        recipe.season,
        recipe.prep_time,
        recipe.cook_time,
        recipe.difficulty,
        marker
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to render JSON")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli_args = parse_args();
    logging::init(cli_args.verbose);

    let config = AppConfig::from_env().context("Invalid configuration")?;

    match cli_args.command {
        Command::Generate {
            region,
            season,
            dietary,
            level,
            save,
        } => {
            let invoker = OpenRouterInvoker::from_config(&config)
                .context("Failed to set up the model client")?;
            let service = RecipeGenerationService::new(Arc::new(invoker));

            let mut constraints = GenerationConstraints::new(region, season);
            constraints.dietary_restrictions = dietary;
            constraints.cooking_level = level;

            eprintln!(
                "Generating a {} recipe from {} with {}...",
                season,
                region,
                service.model_name()
            );
            let save_to = save.then_some(config.saved_recipes_path.as_path());
            let response =
                run_generate(&service, &constraints, save_to, &mut std::io::stdout().lock()).await?;
            // The failure is already in the printed envelope.
            if !response.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Catalog { region, season } => {
            let catalog = RecipeCatalog::builtin()?;
            let recipes: Vec<&Recipe> = match (season, region) {
                (Some(season), Some(region)) => catalog.list_by_season_and_region(season, region),
                (Some(season), None) => catalog.list_by_season(season),
                (None, Some(region)) => catalog.list_by_region(region),
                (None, None) => catalog.all().iter().collect(),
            };
            if recipes.is_empty() {
                println!("No catalog recipes match.");
            }
            recipes.into_iter().for_each(print_summary);
        }
        Command::Random { region, season } => {
            let catalog = RecipeCatalog::builtin()?;
            let season = season.unwrap_or_else(current_season);
            let pick = match region {
                Some(region) => catalog.random_pick(season, region),
                None => catalog.random_by_season(season),
            };
            match pick {
                Some(recipe) => print_json(recipe)?,
                None => println!("No catalog recipe matches {} in {}.", season, region.map(|r| r.to_string()).unwrap_or_else(|| "any region".to_string())),
            }
        }
        Command::Season => println!("{}", current_season()),
        Command::Saved { action } => {
            let mut store = SavedRecipesStore::load(&config.saved_recipes_path).await?;
            match action {
                SavedAction::List => {
                    if store.list().is_empty() {
                        println!("No saved recipes.");
                    }
                    store.list().iter().for_each(print_summary);
                }
                SavedAction::Remove { id } => {
                    if !store.remove(&id).await? {
                        return Err(anyhow!("No saved recipe with id '{}'", id));
                    }
                    println!("Removed {}", id);
                }
                SavedAction::SaveCatalog { id } => {
                    let catalog = RecipeCatalog::builtin()?;
                    let recipe = catalog
                        .find_by_id(&id)
                        .ok_or_else(|| anyhow!("No catalog recipe with id '{}'", id))?;
                    if store.save(recipe.clone()).await? {
                        println!("Saved {}", recipe.title);
                    } else {
                        println!("{} is already saved", recipe.title);
                    }
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
