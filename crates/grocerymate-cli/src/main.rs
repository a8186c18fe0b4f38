//! GroceryMate CLI - check recipes against an inventory from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grocerymate_ai::{LlmClient, RecipeAssistant, RetryPolicy};
use grocerymate_core::validation::{
    validate_inventory_item, validate_new_ingredient, validate_new_recipe, ValidationError,
};
use grocerymate_core::{
    check_recipes, FeasibilityReport, Ingredient, InventoryIndex, InventoryItem, NewIngredient,
    NewRecipe,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "grocerymate")]
#[command(about = "Household inventory and recipe feasibility tool")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check which recipes can be made from an inventory
    Check {
        /// Path to the inventory JSON file (array of {name, quantity, unit})
        #[arg(short, long)]
        inventory: PathBuf,

        /// Path to the recipes JSON file
        #[arg(short, long)]
        recipes: PathBuf,

        /// Print the reports as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Validate a recipes file
    Validate {
        /// Path to the recipes JSON file
        #[arg(short, long)]
        recipes: PathBuf,
    },

    /// Suggest a recipe from an inventory (requires LLM API key)
    Generate {
        /// Path to the inventory JSON file
        #[arg(short, long)]
        inventory: PathBuf,

        /// Output path for the generated recipe
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Attempts per model before giving up
        #[arg(long, env = "AI_MAX_RETRIES", default_value_t = 3)]
        max_retries: u32,

        /// Initial retry delay in milliseconds, doubled on every retry
        #[arg(long, env = "AI_RETRY_BASE_DELAY_MS", default_value_t = 1000)]
        retry_delay_ms: u64,
    },
}

/// A recipe as stored in a recipes file. Ids default to the 1-based position.
#[derive(Debug, Deserialize)]
struct RecipeEntry {
    #[serde(default)]
    id: Option<i64>,
    #[serde(flatten)]
    recipe: NewRecipe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Check {
            inventory,
            recipes,
            json,
        } => {
            check_inventory(&inventory, &recipes, json)?;
        }
        Commands::Validate { recipes } => {
            validate_recipes_file(&recipes)?;
        }
        Commands::Generate {
            inventory,
            output,
            max_retries,
            retry_delay_ms,
        } => {
            let retry = RetryPolicy::new(max_retries, Duration::from_millis(retry_delay_ms));
            generate_recipe(&inventory, output.as_deref(), retry).await?;
        }
    }

    Ok(())
}

fn load_inventory(path: &Path) -> Result<Vec<InventoryItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid inventory file {:?}", path))
}

fn load_recipes(path: &Path) -> Result<Vec<(i64, NewRecipe)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipes {:?}", path))?;
    let entries: Vec<RecipeEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid recipes file {:?}", path))?;
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| (entry.id.unwrap_or(i as i64 + 1), entry.recipe))
        .collect())
}

fn report_invalid(label: &str, errors: &[ValidationError]) {
    eprintln!("{}: invalid", label);
    for error in errors {
        eprintln!("  - {}", error);
    }
}

/// Rejects any inventory row or recipe the API would also reject.
fn ensure_valid(inventory: &[InventoryItem], recipes: &[(i64, NewRecipe)]) -> Result<()> {
    let mut bad_rows = 0;
    for (i, item) in inventory.iter().enumerate() {
        if let Err(errors) = validate_inventory_item(item) {
            bad_rows += 1;
            report_invalid(&format!("inventory[{}] {:?}", i, item.name), &errors);
        }
    }

    let mut bad_recipes = 0;
    for (id, recipe) in recipes {
        if let Err(errors) = validate_new_recipe(recipe) {
            bad_recipes += 1;
            report_invalid(&format!("[{}] {}", id, recipe.title), &errors);
        }
    }

    if bad_rows + bad_recipes > 0 {
        anyhow::bail!(
            "Refusing to check: {} invalid inventory rows, {} invalid recipes",
            bad_rows,
            bad_recipes
        );
    }
    Ok(())
}

fn run_check(inventory: &[InventoryItem], recipes: &[(i64, NewRecipe)]) -> Vec<FeasibilityReport> {
    let index = InventoryIndex::build(inventory);
    check_recipes(
        &index,
        recipes
            .iter()
            .map(|(id, recipe)| (*id, recipe.required_ingredients.as_slice())),
    )
}

fn check_inventory(inventory_path: &Path, recipes_path: &Path, json: bool) -> Result<()> {
    let inventory = load_inventory(inventory_path)?;
    let recipes = load_recipes(recipes_path)?;
    ensure_valid(&inventory, &recipes)?;
    info!(
        "Checking {} recipes against {} inventory items",
        recipes.len(),
        inventory.len()
    );

    let reports = run_check(&inventory, &recipes);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("\n=== Feasibility Report ===");
    for ((_, recipe), report) in recipes.iter().zip(&reports) {
        let verdict = if report.can_make { "can make" } else { "cannot make" };
        println!("\n[{}] {} - {}", report.recipe_id, recipe.title, verdict);
        for item in &report.available_items {
            println!("  + {} ({} {})", item.name, item.quantity, item.unit);
        }
        for item in &report.missing_items {
            match (item.available_quantity, &item.available_unit) {
                (Some(qty), Some(unit)) => println!(
                    "  - {} needs {} {}, have {} {} ({})",
                    item.name, item.quantity, item.unit, qty, unit, item.reason
                ),
                _ => println!(
                    "  - {} needs {} {} ({})",
                    item.name, item.quantity, item.unit, item.reason
                ),
            }
        }
    }

    let makeable = reports.iter().filter(|r| r.can_make).count();
    println!("\nMakeable: {}/{}", makeable, reports.len());

    Ok(())
}

fn validate_recipes_file(path: &Path) -> Result<()> {
    info!("Validating recipes: {:?}", path);

    let recipes = load_recipes(path)?;
    let mut failed = 0;
    for (id, recipe) in &recipes {
        match validate_new_recipe(recipe) {
            Ok(()) => println!(
                "[{}] {}: valid ({} ingredients)",
                id,
                recipe.title,
                recipe.required_ingredients.len()
            ),
            Err(errors) => {
                failed += 1;
                report_invalid(&format!("[{}] {}", id, recipe.title), &errors);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} recipes failed validation", failed, recipes.len());
    }
    println!("All {} recipes are valid!", recipes.len());
    Ok(())
}

fn load_stock(path: &Path) -> Result<Vec<Ingredient>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory {:?}", path))?;
    let items: Vec<NewIngredient> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid inventory file {:?}", path))?;

    let mut bad_rows = 0;
    for (i, item) in items.iter().enumerate() {
        if let Err(errors) = validate_new_ingredient(item) {
            bad_rows += 1;
            report_invalid(&format!("inventory[{}] {:?}", i, item.name), &errors);
        }
    }
    if bad_rows > 0 {
        anyhow::bail!("{} of {} inventory rows failed validation", bad_rows, items.len());
    }

    let now = chrono::Utc::now();
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Ingredient::new(i as i64 + 1, 0, item, now))
        .collect())
}

async fn generate_recipe(inventory_path: &Path, output: Option<&Path>, retry: RetryPolicy) -> Result<()> {
    let inventory = load_stock(inventory_path)?;

    let client = LlmClient::from_env()?.with_retry(retry);
    info!("Calling LLM API...");
    let recipe = client.suggest_recipe(&inventory).await?;

    let json = serde_json::to_string_pretty(&recipe)?;
    println!("\n=== Generated Recipe ===");
    println!("{}", json);

    if let Some(output) = output {
        std::fs::write(output, &json).with_context(|| format!("Failed to write {:?}", output))?;
        println!("\nSaved to: {:?}", output);
    }

    Ok(())
}
