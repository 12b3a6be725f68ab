//! Data models for items, recipes, market orders and finished plans

use std::collections::BTreeMap;
use std::fmt;

/// An item identifier paired with a quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuantity {
    pub item_id: String,
    pub quantity: u64,
}

impl ItemQuantity {
    pub fn new(item_id: impl Into<String>, quantity: u64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

impl fmt::Display for ItemQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.item_id, self.quantity)
    }
}

/// A production rule: consumes a set of items, produces one item
#[derive(Debug, Clone)]
pub struct Recipe {
    pub recipe_id: String,
    pub produced: ItemQuantity,
    consumed: Vec<ItemQuantity>,
    consumed_qty: BTreeMap<String, u64>,
}

impl Recipe {
    /// Build a recipe. Repeated consumed items are summed into one lookup entry.
    pub fn new(recipe_id: impl Into<String>, produced: ItemQuantity, consumed: Vec<ItemQuantity>) -> Self {
        let mut consumed_qty = BTreeMap::new();
        for c in &consumed {
            *consumed_qty.entry(c.item_id.clone()).or_insert(0) += c.quantity;
        }

        Self {
            recipe_id: recipe_id.into(),
            produced,
            consumed,
            consumed_qty,
        }
    }

    /// Consumed items in definition order, repeats included
    pub fn consumed(&self) -> &[ItemQuantity] {
        &self.consumed
    }

    /// Units of `item_id` used by one invocation (0 if not consumed)
    pub fn consumed_qty(&self, item_id: &str) -> u64 {
        self.consumed_qty.get(item_id).copied().unwrap_or(0)
    }

    /// Distinct consumed items, in identifier order
    pub fn consumed_items(&self) -> impl Iterator<Item = (&str, u64)> {
        self.consumed_qty.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}

/// Which way a market order trades, seen from the market's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    /// The market sells to us: we can buy here, and pay for it
    Sell,
    /// The market buys from us: we could sell surplus here
    Buy,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Sell => "sell",
            OrderSide::Buy => "buy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sell" => Some(OrderSide::Sell),
            "buy" => Some(OrderSide::Buy),
            _ => None,
        }
    }
}

/// Maximum quantity an order can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Bounded(u64),
    Unbounded,
}

impl Capacity {
    /// Concrete upper bound, substituting `effective_infinity` for `Unbounded`.
    /// Bounded lots keep their own size, even above `effective_infinity`.
    pub fn resolve(&self, effective_infinity: i64) -> i64 {
        match *self {
            Capacity::Bounded(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Capacity::Unbounded => effective_infinity,
        }
    }

    pub fn as_option(&self) -> Option<u64> {
        match *self {
            Capacity::Bounded(n) => Some(n),
            Capacity::Unbounded => None,
        }
    }
}

impl From<Option<u64>> for Capacity {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Capacity::Unbounded, Capacity::Bounded)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(n) => write!(f, "{}", n),
            Capacity::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// One priced, quantity-capped lot on the market
#[derive(Debug, Clone)]
pub struct MarketOrder {
    pub trade_id: String,
    pub side: OrderSide,
    pub item_id: String,
    pub capacity: Capacity,
    pub unit_price: u64,
}

impl MarketOrder {
    /// Convenience constructor for an order we can buy from
    pub fn sell(trade_id: impl Into<String>, item_id: impl Into<String>, capacity: Capacity, unit_price: u64) -> Self {
        Self {
            trade_id: trade_id.into(),
            side: OrderSide::Sell,
            item_id: item_id.into(),
            capacity,
            unit_price,
        }
    }

    /// Convenience constructor for an order we could sell into
    pub fn buy(trade_id: impl Into<String>, item_id: impl Into<String>, capacity: Capacity, unit_price: u64) -> Self {
        Self {
            side: OrderSide::Buy,
            ..Self::sell(trade_id, item_id, capacity, unit_price)
        }
    }
}

/// Everything a planning request can draw on
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<String>,
    pub recipes: Vec<Recipe>,
    pub orders: Vec<MarketOrder>,
}

/// A market order to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEntry {
    pub trade_id: String,
    pub item_id: String,
    pub quantity: u64,
    pub unit_price: u64,
}

impl TradeEntry {
    pub fn cost(&self) -> u128 {
        u128::from(self.quantity) * u128::from(self.unit_price)
    }
}

/// A recipe to invoke `count` times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftEntry {
    pub recipe_id: String,
    pub count: u64,
}

/// Result of a successful planning request
#[derive(Debug, Clone)]
pub struct Plan {
    pub target: ItemQuantity,
    pub total_cost: u128,
    pub trades: Vec<TradeEntry>,
    pub crafts: Vec<CraftEntry>,
    pub leftovers: Vec<ItemQuantity>,
    pub item_costs: Vec<(String, u128)>,
    pub total_units_bought: u64,
    pub total_crafts: u64,
    pub proven_optimal: bool,
}

impl Plan {
    pub fn trade(&self, trade_id: &str) -> Option<&TradeEntry> {
        self.trades.iter().find(|t| t.trade_id == trade_id)
    }

    pub fn craft_count(&self, recipe_id: &str) -> u64 {
        self.crafts
            .iter()
            .find(|c| c.recipe_id == recipe_id)
            .map_or(0, |c| c.count)
    }

    pub fn leftover(&self, item_id: &str) -> u64 {
        self.leftovers
            .iter()
            .find(|l| l.item_id == item_id)
            .map_or(0, |l| l.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumed_lookup_sums_repeated_items() {
        let recipe = Recipe::new(
            "r",
            ItemQuantity::new("out", 1),
            vec![
                ItemQuantity::new("a", 2),
                ItemQuantity::new("b", 1),
                ItemQuantity::new("a", 3),
            ],
        );

        assert_eq!(recipe.consumed_qty("a"), 5);
        assert_eq!(recipe.consumed_qty("b"), 1);
        assert_eq!(recipe.consumed_qty("c"), 0);
        assert_eq!(recipe.consumed_items().count(), 2);
    }

    #[test]
    fn consumed_list_and_lookup_agree() {
        let recipe = Recipe::new(
            "r",
            ItemQuantity::new("out", 1),
            vec![ItemQuantity::new("a", 2), ItemQuantity::new("a", 3)],
        );

        assert_eq!(recipe.consumed().len(), 2);
        let listed: u64 = recipe
            .consumed()
            .iter()
            .filter(|c| c.item_id == "a")
            .map(|c| c.quantity)
            .sum();
        assert_eq!(listed, recipe.consumed_qty("a"));

        let copy = recipe.clone();
        assert_eq!(copy.consumed(), recipe.consumed());
        assert_eq!(copy.consumed_qty("a"), 5);
    }

    #[test]
    fn capacity_resolves_against_effective_infinity() {
        assert_eq!(Capacity::Unbounded.resolve(1_000), 1_000);
        assert_eq!(Capacity::Bounded(5).resolve(1_000), 5);
        assert_eq!(Capacity::Bounded(5_000).resolve(1_000), 5_000);
        assert_eq!(Capacity::Bounded(u64::MAX).resolve(1_000), i64::MAX);
        assert_eq!(Capacity::from(None), Capacity::Unbounded);
        assert_eq!(Capacity::from(Some(3)), Capacity::Bounded(3));
    }

    #[test]
    fn trade_cost_does_not_overflow() {
        let trade = TradeEntry {
            trade_id: "t".to_string(),
            item_id: "gold".to_string(),
            quantity: 4,
            unit_price: 10_000_000_000_000_000_000,
        };
        assert_eq!(trade.cost(), 40_000_000_000_000_000_000);
    }

    #[test]
    fn order_side_parses_its_own_names() {
        for side in [OrderSide::Sell, OrderSide::Buy] {
            assert_eq!(OrderSide::parse(side.as_str()), Some(side));
        }
        assert_eq!(OrderSide::parse("bid"), None);
    }
}
