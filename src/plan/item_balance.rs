//! Per-item flow balance over the order and recipe arena

use crate::solver::{Assignment, Comparison, LinearExpr, Model};

use super::{MarketOrderNode, OrderRef, RecipeNode, RecipeRef};

/// Borrowed view of the builder's node arena
#[derive(Debug, Clone, Copy)]
pub struct NodeArena<'n, 'a> {
    pub orders: &'n [MarketOrderNode<'a>],
    pub recipes: &'n [RecipeNode<'a>],
}

/// Arena entries that touch one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLinks {
    /// Orders on this item that we can buy from
    pub sell_orders: Vec<OrderRef>,
    pub producing: Vec<RecipeRef>,
    pub consuming: Vec<RecipeRef>,
}

/// Flow balance for one item:
///
/// `bought + produced - consumed >= additional_demand`
///
/// The inequality is slack on purpose; any surplus is reported as a leftover.
#[derive(Debug)]
pub struct ItemBalanceNode<'a> {
    pub item_id: &'a str,
    pub additional_demand: i64,
    pub links: ItemLinks,
    bought: LinearExpr,
    produced: LinearExpr,
    consumed: LinearExpr,
    cost: LinearExpr,
}

impl<'a> ItemBalanceNode<'a> {
    /// Wire the linked orders and recipes together and add the balance constraint
    pub fn new(
        model: &mut Model,
        item_id: &'a str,
        additional_demand: i64,
        arena: NodeArena<'_, 'a>,
        links: ItemLinks,
    ) -> Self {
        let mut bought = LinearExpr::new();
        let mut cost = LinearExpr::new();
        for r in &links.sell_orders {
            let order = &arena.orders[r.0];
            bought.add_expr(&order.quantity());
            cost.add_expr(&order.trade_value());
        }

        let mut produced = LinearExpr::new();
        for r in &links.producing {
            produced.add_expr(&arena.recipes[r.0].produced_quantity());
        }

        let mut consumed = LinearExpr::new();
        for r in &links.consuming {
            consumed.add_expr(&arena.recipes[r.0].consumed_quantity(item_id));
        }

        let node = Self {
            item_id,
            additional_demand,
            links,
            bought,
            produced,
            consumed,
            cost,
        };

        let mut net = node.supply();
        net.sub_expr(&node.consumed);
        model.add_constraint(net, Comparison::Ge, additional_demand);

        node
    }

    pub fn bought(&self) -> &LinearExpr {
        &self.bought
    }

    pub fn produced(&self) -> &LinearExpr {
        &self.produced
    }

    pub fn consumed(&self) -> &LinearExpr {
        &self.consumed
    }

    /// Spend on this item's market orders
    pub fn cost(&self) -> &LinearExpr {
        &self.cost
    }

    /// bought + produced
    pub fn supply(&self) -> LinearExpr {
        let mut supply = self.bought.clone();
        supply.add_expr(&self.produced);
        supply
    }

    /// bought + produced - consumed - additional_demand
    pub fn leftover(&self) -> LinearExpr {
        let mut leftover = self.supply();
        leftover.sub_expr(&self.consumed);
        leftover.add_constant(-self.additional_demand);
        leftover
    }

    pub fn leftover_value(&self, assignment: &Assignment) -> i128 {
        assignment.evaluate(&self.leftover())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capacity, ItemQuantity, MarketOrder, Recipe};

    #[test]
    fn balance_wires_orders_and_recipes() {
        let order = MarketOrder::sell("plank_tier", "plank", Capacity::Bounded(10), 2);
        let make_plank = Recipe::new("saw", ItemQuantity::new("plank", 3), vec![ItemQuantity::new("log", 1)]);
        let make_stick = Recipe::new("whittle", ItemQuantity::new("stick", 4), vec![ItemQuantity::new("plank", 2)]);

        let mut model = Model::new();
        let orders = vec![MarketOrderNode::new(&mut model, &order, 1_000)];
        let recipes = vec![
            RecipeNode::new(&mut model, &make_plank, 1_000),
            RecipeNode::new(&mut model, &make_stick, 1_000),
        ];

        let arena = NodeArena {
            orders: &orders,
            recipes: &recipes,
        };
        let links = ItemLinks {
            sell_orders: vec![OrderRef(0)],
            producing: vec![RecipeRef(0)],
            consuming: vec![RecipeRef(1)],
        };
        let node = ItemBalanceNode::new(&mut model, "plank", 1, arena, links);

        assert_eq!(model.constraints().len(), 1);
        assert_eq!(model.constraints()[0].rhs, 1);

        // buy 5, saw twice, whittle 5 times
        let assignment = Assignment::new(vec![5, 2, 5]);
        assert_eq!(assignment.evaluate(node.bought()), 5);
        assert_eq!(assignment.evaluate(node.produced()), 6);
        assert_eq!(assignment.evaluate(node.consumed()), 10);
        assert_eq!(assignment.evaluate(node.cost()), 10);
        assert_eq!(node.leftover_value(&assignment), 0);
    }

    #[test]
    fn item_without_sources_gets_constant_constraint() {
        let mut model = Model::new();
        let arena = NodeArena {
            orders: &[],
            recipes: &[],
        };
        let node = ItemBalanceNode::new(&mut model, "unobtainium", 13, arena, ItemLinks::default());

        let constraint = &model.constraints()[0];
        assert!(constraint.expr.is_constant());
        assert!(!constraint.cmp.holds(constraint.expr.constant_part(), constraint.rhs));
        assert_eq!(node.leftover_value(&Assignment::new(vec![])), -13);
    }
}
