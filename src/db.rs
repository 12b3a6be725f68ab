//! Catalog schema and operations

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::models::{Capacity, Catalog, ItemQuantity, MarketOrder, OrderSide, Recipe};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Known items; recipes and orders may only reference these
        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY
        );

        -- Production rules (one output each)
        CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            produced_item TEXT NOT NULL,
            produced_qty INTEGER NOT NULL
        );

        -- What one invocation of a recipe consumes
        CREATE TABLE IF NOT EXISTS recipe_inputs (
            recipe_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            item_id TEXT NOT NULL,
            qty INTEGER NOT NULL,
            PRIMARY KEY (recipe_id, position)
        );

        -- Market orders; capacity NULL means unbounded
        CREATE TABLE IF NOT EXISTS market_orders (
            id TEXT PRIMARY KEY,
            side TEXT NOT NULL,
            item_id TEXT NOT NULL,
            capacity INTEGER,
            unit_price INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recipes_produced ON recipes(produced_item);
        CREATE INDEX IF NOT EXISTS idx_market_orders_item ON market_orders(item_id);
        "#,
    )?;
    Ok(())
}

fn to_sql_int(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("quantity {} does not fit in SQLite INTEGER", value))
}

/// Insert an item (no-op if it already exists)
pub fn upsert_item(conn: &Connection, item_id: &str) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO items (id) VALUES (?1)", [item_id])?;
    Ok(())
}

/// Insert or replace a recipe together with its inputs
pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO recipes (id, produced_item, produced_qty) VALUES (?1, ?2, ?3)",
        (
            &recipe.recipe_id,
            &recipe.produced.item_id,
            to_sql_int(recipe.produced.quantity)?,
        ),
    )?;
    conn.execute("DELETE FROM recipe_inputs WHERE recipe_id = ?1", [&recipe.recipe_id])?;

    for (position, input) in recipe.consumed().iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_inputs (recipe_id, position, item_id, qty) VALUES (?1, ?2, ?3, ?4)",
            (
                &recipe.recipe_id,
                position as i64,
                &input.item_id,
                to_sql_int(input.quantity)?,
            ),
        )?;
    }
    Ok(())
}

/// Insert or replace a market order
pub fn insert_market_order(conn: &Connection, order: &MarketOrder) -> Result<()> {
    let capacity = order.capacity.as_option().map(to_sql_int).transpose()?;
    conn.execute(
        "INSERT OR REPLACE INTO market_orders (id, side, item_id, capacity, unit_price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &order.trade_id,
            order.side.as_str(),
            &order.item_id,
            capacity,
            to_sql_int(order.unit_price)?,
        ),
    )?;
    Ok(())
}

/// Write every item, recipe and order of a catalog
pub fn store_catalog(conn: &Connection, catalog: &Catalog) -> Result<()> {
    for item in &catalog.items {
        upsert_item(conn, item)?;
    }
    for recipe in &catalog.recipes {
        insert_recipe(conn, recipe)?;
    }
    for order in &catalog.orders {
        insert_market_order(conn, order)?;
    }
    Ok(())
}

/// Clear all catalog data (for re-import)
pub fn clear_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM market_orders;
        DELETE FROM recipe_inputs;
        DELETE FROM recipes;
        DELETE FROM items;
        "#,
    )?;
    Ok(())
}

/// List all item ids
pub fn list_items(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM items ORDER BY id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// List all recipes with their inputs in insertion order
pub fn list_recipes(conn: &Connection) -> Result<Vec<Recipe>> {
    let mut stmt = conn.prepare("SELECT id, produced_item, produced_qty FROM recipes ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut headers = Vec::new();
    for row in rows {
        headers.push(row?);
    }

    let mut input_stmt =
        conn.prepare("SELECT item_id, qty FROM recipe_inputs WHERE recipe_id = ?1 ORDER BY position")?;

    let mut results = Vec::new();
    for (id, produced_item, produced_qty) in headers {
        let inputs = input_stmt.query_map([&id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut consumed = Vec::new();
        for input in inputs {
            let (item_id, qty) = input?;
            consumed.push(ItemQuantity::new(item_id, from_sql_int(qty, "recipe input")?));
        }

        let produced = ItemQuantity::new(produced_item, from_sql_int(produced_qty, "recipe output")?);
        results.push(Recipe::new(id, produced, consumed));
    }
    Ok(results)
}

fn from_sql_int(value: i64, what: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("negative {} quantity {} in catalog", what, value))
}

/// List all market orders
pub fn list_market_orders(conn: &Connection) -> Result<Vec<MarketOrder>> {
    let mut stmt = conn.prepare(
        "SELECT id, side, item_id, capacity, unit_price FROM market_orders ORDER BY item_id, id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<i64>>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (trade_id, side, item_id, capacity, unit_price) = row?;
        let side = OrderSide::parse(&side)
            .ok_or_else(|| anyhow!("market order '{}' has unknown side '{}'", trade_id, side))?;
        let capacity = capacity
            .map(|c| from_sql_int(c, "order capacity"))
            .transpose()?;

        results.push(MarketOrder {
            trade_id,
            side,
            item_id,
            capacity: Capacity::from(capacity),
            unit_price: from_sql_int(unit_price, "order price")?,
        });
    }
    Ok(results)
}

/// Load the whole catalog for planning
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    Ok(Catalog {
        items: list_items(conn)?,
        recipes: list_recipes(conn)?,
        orders: list_market_orders(conn)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_catalog;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn catalog_survives_a_round_trip() {
        let conn = memory_db();
        let catalog = sample_catalog();
        store_catalog(&conn, &catalog).unwrap();

        let loaded = load_catalog(&conn).unwrap();
        assert_eq!(loaded.items.len(), catalog.items.len());
        assert_eq!(loaded.recipes.len(), 3);
        assert_eq!(loaded.orders.len(), 6);

        let sword = loaded
            .recipes
            .iter()
            .find(|r| r.recipe_id == "iron_sword")
            .unwrap();
        assert_eq!(sword.consumed_qty("minecraft:iron_ingot"), 2);
        assert_eq!(sword.consumed()[1].item_id, "minecraft:stick");

        let discount = loaded
            .orders
            .iter()
            .find(|o| o.trade_id == "plank_a_discount")
            .unwrap();
        assert_eq!(discount.capacity, Capacity::Bounded(2));
        let market = loaded
            .orders
            .iter()
            .find(|o| o.trade_id == "plank_a_market")
            .unwrap();
        assert_eq!(market.capacity, Capacity::Unbounded);
    }

    #[test]
    fn reinserting_a_recipe_replaces_its_inputs() {
        let conn = memory_db();
        let first = Recipe::new("r", ItemQuantity::new("out", 1), vec![ItemQuantity::new("a", 1)]);
        let second = Recipe::new("r", ItemQuantity::new("out", 2), vec![ItemQuantity::new("b", 3)]);
        insert_recipe(&conn, &first).unwrap();
        insert_recipe(&conn, &second).unwrap();

        let recipes = list_recipes(&conn).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].produced.quantity, 2);
        assert_eq!(recipes[0].consumed(), vec![ItemQuantity::new("b", 3)]);
    }

    #[test]
    fn clear_removes_everything() {
        let conn = memory_db();
        store_catalog(&conn, &sample_catalog()).unwrap();
        clear_catalog(&conn).unwrap();

        let loaded = load_catalog(&conn).unwrap();
        assert!(loaded.items.is_empty());
        assert!(loaded.recipes.is_empty());
        assert!(loaded.orders.is_empty());
    }
}
