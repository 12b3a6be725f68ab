//! Craft Planner
//!
//! Finds the cheapest mix of market purchases and crafting for a target item.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use craft_planner::calculator::{self, PlanSummary};
use craft_planner::config::DEFAULT_EFFECTIVE_INFINITY;
use craft_planner::{db, extract, sample, ItemQuantity, PlanError, PlannerConfig};

#[derive(Parser)]
#[command(name = "craft-planner")]
#[command(about = "Minimum-cost production planner over recipes and market orders")]
struct Cli {
    /// Path to the SQLite catalog
    #[arg(short, long, default_value = "catalog.db")]
    database: PathBuf,

    /// Upper bound used in place of "unbounded" quantities
    #[arg(long, env = "CRAFT_PLANNER_INFINITY", default_value_t = DEFAULT_EFFECTIVE_INFINITY)]
    infinity: i64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import item, recipe and market definitions from *.defs files
    Import {
        /// Directory to scan
        source_dir: PathBuf,

        /// Clear existing catalog before importing
        #[arg(long)]
        clear: bool,
    },

    /// Compute the cheapest plan for a target item
    Plan {
        /// Target item id (e.g., "minecraft:iron_sword")
        item: String,

        /// Quantity required
        #[arg(short, long, default_value = "1")]
        quantity: u64,

        /// Show spend breakdown and totals
        #[arg(long)]
        details: bool,
    },

    /// List all known items
    ListItems,

    /// List all recipes
    ListRecipes,

    /// List all market orders
    ListMarket,

    /// Initialize empty catalog with schema
    Init,

    /// Load the built-in sample catalog
    LoadSample,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { source_dir, clear } => {
            if clear {
                println!("Clearing existing catalog...");
                db::clear_catalog(&conn)?;
            }

            let stats = extract::extract_to_database(&conn, &source_dir)?;
            println!("\n{}", stats);
        }

        Commands::Plan {
            item,
            quantity,
            details,
        } => {
            let target = ItemQuantity::new(item, quantity);
            let config = PlannerConfig::with_effective_infinity(cli.infinity);

            match calculator::calculate_plan(&conn, &target, config)? {
                Ok(plan) => println!("{}", PlanSummary::new(&plan, details)),
                Err(e @ PlanError::Infeasible { .. }) => {
                    println!("No plan: {}", e);
                    return Ok(ExitCode::from(2));
                }
                Err(e) if e.is_definition_error() => {
                    eprintln!("Invalid catalog or request: {}", e);
                    return Ok(ExitCode::from(3));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::ListItems => {
            let items = db::list_items(&conn)?;
            if items.is_empty() {
                println!("No items in catalog. Run 'import' or 'load-sample' first.");
            } else {
                println!("Items:");
                for item in items {
                    println!("  {}", item);
                }
            }
        }

        Commands::ListRecipes => {
            let recipes = db::list_recipes(&conn)?;
            if recipes.is_empty() {
                println!("No recipes in catalog. Run 'import' or 'load-sample' first.");
            } else {
                for r in recipes {
                    let inputs: Vec<String> = r.consumed().iter().map(|c| c.to_string()).collect();
                    println!("{:<24} {} <- {}", r.recipe_id, r.produced, inputs.join(", "));
                }
            }
        }

        Commands::ListMarket => {
            let orders = db::list_market_orders(&conn)?;
            if orders.is_empty() {
                println!("No market orders in catalog. Run 'import' or 'load-sample' first.");
            } else {
                println!("{:<24} {:<6} {:<28} {:>10} {:>8}", "Order", "Side", "Item", "Capacity", "Price");
                println!("{}", "-".repeat(80));
                for o in orders {
                    println!(
                        "{:<24} {:<6} {:<28} {:>10} {:>8}",
                        o.trade_id,
                        o.side.as_str(),
                        o.item_id,
                        o.capacity.to_string(),
                        o.unit_price
                    );
                }
            }
        }

        Commands::Init => {
            println!("Catalog initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            db::clear_catalog(&conn)?;
            let catalog = sample::sample_catalog();
            db::store_catalog(&conn, &catalog)?;
            println!(
                "Loaded sample catalog: {} items, {} recipes, {} market orders",
                catalog.items.len(),
                catalog.recipes.len(),
                catalog.orders.len()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
