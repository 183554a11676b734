use clap::{Parser, Subcommand};

use crate::recipe::{Difficulty, Region, Season};

#[derive(Parser, Debug)]
#[command(author, version, about = "Seasonal German recipes, from the catalog or freshly generated", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new recipe with the language model
    Generate {
        /// Bavaria, Rhineland, Northern, Swabia or Central
        #[arg(short, long)]
        region: Region,
        /// Spring, Summer, Autumn or Winter
        #[arg(short, long)]
        season: Season,
        /// Free-text dietary restrictions, e.g. "vegetarian"
        #[arg(short, long)]
        dietary: Option<String>,
        /// Easy, Medium or Hard (default: Medium)
        #[arg(short, long)]
        level: Option<Difficulty>,
        /// Add the generated recipe to the saved recipes
        #[arg(long)]
        save: bool,
    },
    /// List catalog recipes, optionally filtered
    Catalog {
        #[arg(short, long)]
        region: Option<Region>,
        #[arg(short, long)]
        season: Option<Season>,
    },
    /// Pick a random catalog recipe (season defaults to the current one)
    Random {
        #[arg(short, long)]
        region: Option<Region>,
        #[arg(short, long)]
        season: Option<Season>,
    },
    /// Print the current season
    Season,
    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SavedAction {
    /// List saved recipes
    List,
    /// Remove a saved recipe by id
    Remove { id: String },
    /// Save a catalog recipe by id
    SaveCatalog { id: String },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
