//! Import of catalog definitions from `.defs` text files
//!
//! Each non-empty, non-comment line is one of:
//!
//! ```text
//! item <id>
//! recipe <id> produces <qty> <item>
//!     consumes <qty> <item>          (indented, belongs to the recipe above)
//! sell <trade-id> <item> <capacity|unbounded> @ <price>
//! buy  <trade-id> <item> <capacity|unbounded> @ <price>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::db;
use crate::models::{Capacity, Catalog, ItemQuantity, MarketOrder, OrderSide, Recipe};

/// Definitions parsed from one file before database insertion
#[derive(Debug, Default)]
struct ExtractedDefs {
    items: Vec<String>,
    recipes: Vec<PendingRecipe>,
    orders: Vec<MarketOrder>,
}

#[derive(Debug)]
struct PendingRecipe {
    id: String,
    produced: ItemQuantity,
    consumed: Vec<ItemQuantity>,
}

struct LinePatterns {
    item: Regex,
    recipe: Regex,
    consumes: Regex,
    order: Regex,
}

impl LinePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            item: Regex::new(r"^item\s+(\S+)$")?,
            recipe: Regex::new(r"^recipe\s+(\S+)\s+produces\s+(\d+)\s+(\S+)$")?,
            consumes: Regex::new(r"^\s+consumes\s+(\d+)\s+(\S+)$")?,
            order: Regex::new(r"^(sell|buy)\s+(\S+)\s+(\S+)\s+(\d+|unbounded)\s*@\s*(\d+)$")?,
        })
    }
}

/// Find all `*.defs` files below a directory
pub fn find_definition_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "defs") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn parse_qty(s: &str, line_no: usize) -> Result<u64> {
    s.parse::<u64>()
        .with_context(|| format!("line {}: quantity '{}' out of range", line_no, s))
}

fn parse_definitions(content: &str, patterns: &LinePatterns) -> Result<ExtractedDefs> {
    let mut defs = ExtractedDefs::default();
    // Only the definition directly above may receive 'consumes' lines
    let mut recipe_open = false;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim_end();

        if line.trim().is_empty() {
            continue;
        }

        // Indented lines continue the recipe they follow
        if let Some(cap) = patterns.consumes.captures(line) {
            let recipe = defs
                .recipes
                .last_mut()
                .filter(|_| recipe_open)
                .ok_or_else(|| anyhow!("line {}: 'consumes' outside of a recipe", line_no))?;
            recipe
                .consumed
                .push(ItemQuantity::new(&cap[2], parse_qty(&cap[1], line_no)?));
            continue;
        }

        let line = line.trim_start();
        recipe_open = false;
        if let Some(cap) = patterns.item.captures(line) {
            defs.items.push(cap[1].to_string());
        } else if let Some(cap) = patterns.recipe.captures(line) {
            defs.recipes.push(PendingRecipe {
                id: cap[1].to_string(),
                produced: ItemQuantity::new(&cap[3], parse_qty(&cap[2], line_no)?),
                consumed: Vec::new(),
            });
            recipe_open = true;
        } else if let Some(cap) = patterns.order.captures(line) {
            let side = OrderSide::parse(&cap[1]).ok_or_else(|| anyhow!("line {}: bad side", line_no))?;
            let capacity = match &cap[4] {
                "unbounded" => Capacity::Unbounded,
                n => Capacity::Bounded(parse_qty(n, line_no)?),
            };
            defs.orders.push(MarketOrder {
                trade_id: cap[2].to_string(),
                side,
                item_id: cap[3].to_string(),
                capacity,
                unit_price: parse_qty(&cap[5], line_no)?,
            });
        } else {
            bail!("line {}: unrecognized definition '{}'", line_no, line.trim());
        }
    }

    Ok(defs)
}

/// Parse a definition file into a catalog fragment
pub fn parse_definition_file(path: &Path) -> Result<Catalog> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let patterns = LinePatterns::new()?;
    let defs = parse_definitions(&content, &patterns)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Catalog {
        items: defs.items,
        recipes: defs
            .recipes
            .into_iter()
            .map(|r| Recipe::new(r.id, r.produced, r.consumed))
            .collect(),
        orders: defs.orders,
    })
}

/// Import every definition file below `dir` into the database
pub fn extract_to_database(conn: &Connection, dir: &Path) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    println!("Scanning {} for definition files...", dir.display());
    let files = find_definition_files(dir)?;
    println!("Found {} definition files", files.len());

    for path in &files {
        match parse_definition_file(path) {
            Ok(catalog) if catalog.items.is_empty() && catalog.recipes.is_empty() && catalog.orders.is_empty() => {
                stats.skipped += 1;
            }
            Ok(catalog) => {
                db::store_catalog(conn, &catalog)?;

                stats.items += catalog.items.len();
                stats.recipes += catalog.recipes.len();
                stats.orders += catalog.orders.len();

                println!(
                    "  Parsed: {} (items: {}, recipes: {}, orders: {})",
                    path.display(),
                    catalog.items.len(),
                    catalog.recipes.len(),
                    catalog.orders.len()
                );
            }
            Err(e) => {
                eprintln!("  Error parsing {}: {:#}", path.display(), e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ExtractStats {
    pub items: usize,
    pub recipes: usize,
    pub orders: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} items, {} recipes, {} market orders. Skipped: {}, Errors: {}",
            self.items, self.recipes, self.orders, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWORD_DEFS: &str = "\
# swords
item iron_sword
item iron_ingot
item stick

recipe sword produces 1 iron_sword
    consumes 2 iron_ingot
    consumes 1 stick   # handle

sell ingot_lot iron_ingot unbounded @ 10
sell stick_lot stick 50 @ 3
buy ingot_bid iron_ingot 5 @ 8
";

    #[test]
    fn parses_every_definition_kind() {
        let patterns = LinePatterns::new().unwrap();
        let defs = parse_definitions(SWORD_DEFS, &patterns).unwrap();

        assert_eq!(defs.items, vec!["iron_sword", "iron_ingot", "stick"]);
        assert_eq!(defs.recipes.len(), 1);
        assert_eq!(defs.recipes[0].produced, ItemQuantity::new("iron_sword", 1));
        assert_eq!(
            defs.recipes[0].consumed,
            vec![ItemQuantity::new("iron_ingot", 2), ItemQuantity::new("stick", 1)]
        );

        assert_eq!(defs.orders.len(), 3);
        assert_eq!(defs.orders[0].capacity, Capacity::Unbounded);
        assert_eq!(defs.orders[1].capacity, Capacity::Bounded(50));
        assert_eq!(defs.orders[1].unit_price, 3);
        assert_eq!(defs.orders[2].side, OrderSide::Buy);
    }

    #[test]
    fn consumes_without_recipe_is_an_error() {
        let patterns = LinePatterns::new().unwrap();
        let err = parse_definitions("  consumes 2 plank\n", &patterns).unwrap_err();
        assert!(err.to_string().contains("outside of a recipe"));
    }

    #[test]
    fn consumes_after_another_definition_is_an_error() {
        let patterns = LinePatterns::new().unwrap();
        let content = "recipe saw produces 3 beam\n    consumes 2 wood\nitem wood\n    consumes 1 iron\n";
        let err = parse_definitions(content, &patterns).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("outside of a recipe"));
    }

    #[test]
    fn blank_lines_and_comments_keep_a_recipe_open() {
        let patterns = LinePatterns::new().unwrap();
        let content = "recipe saw produces 3 beam\n\n    # cut\n    consumes 2 wood\n";
        let defs = parse_definitions(content, &patterns).unwrap();
        assert_eq!(defs.recipes[0].consumed, vec![ItemQuantity::new("wood", 2)]);
    }

    #[test]
    fn unknown_lines_are_rejected_with_line_number() {
        let patterns = LinePatterns::new().unwrap();
        let err = parse_definitions("item a\nteleport a b\n", &patterns).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn imports_a_directory_into_the_database() {
        let dir = std::env::temp_dir().join(format!("craft_planner_extract_{}", std::process::id()));
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("swords.defs"), SWORD_DEFS).unwrap();
        fs::write(dir.join("nested").join("broken.defs"), "recipe x produces\n").unwrap();
        fs::write(dir.join("nested").join("empty.defs"), "# nothing here\n").unwrap();
        fs::write(dir.join("notes.txt"), "item ignored\n").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let stats = extract_to_database(&conn, &dir).unwrap();

        assert_eq!(stats.items, 3);
        assert_eq!(stats.recipes, 1);
        assert_eq!(stats.orders, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(db::list_items(&conn).unwrap().len(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }
}
