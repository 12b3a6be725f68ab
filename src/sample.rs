//! Built-in example catalog

use crate::models::{Capacity, Catalog, ItemQuantity, MarketOrder, Recipe};

/// Iron swords from ingots and sticks; sticks from either of two plank kinds.
///
/// Planks come in a cheap tier of 2 and an expensive unbounded tier, so a
/// 13-sword plan crafts sticks from both kinds.
pub fn sample_catalog() -> Catalog {
    let items = [
        "minecraft:iron_sword",
        "minecraft:iron_ingot",
        "minecraft:stick",
        "minecraft:plank_a",
        "minecraft:plank_b",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let recipes = vec![
        Recipe::new(
            "iron_sword",
            ItemQuantity::new("minecraft:iron_sword", 1),
            vec![
                ItemQuantity::new("minecraft:iron_ingot", 2),
                ItemQuantity::new("minecraft:stick", 1),
            ],
        ),
        Recipe::new(
            "stick_from_plank_a",
            ItemQuantity::new("minecraft:stick", 4),
            vec![ItemQuantity::new("minecraft:plank_a", 2)],
        ),
        Recipe::new(
            "stick_from_plank_b",
            ItemQuantity::new("minecraft:stick", 4),
            vec![ItemQuantity::new("minecraft:plank_b", 2)],
        ),
    ];

    let orders = vec![
        MarketOrder::sell("iron_ingot_market", "minecraft:iron_ingot", Capacity::Unbounded, 10),
        MarketOrder::sell("stick_market", "minecraft:stick", Capacity::Unbounded, 1000),
        MarketOrder::sell("plank_a_market", "minecraft:plank_a", Capacity::Unbounded, 100),
        MarketOrder::sell("plank_a_discount", "minecraft:plank_a", Capacity::Bounded(2), 1),
        MarketOrder::sell("plank_b_market", "minecraft:plank_b", Capacity::Unbounded, 100),
        MarketOrder::sell("plank_b_discount", "minecraft:plank_b", Capacity::Bounded(2), 1),
    ];

    Catalog { items, recipes, orders }
}
