//! Projection of a solved assignment onto a finished plan

use crate::models::{CraftEntry, ItemQuantity, Plan, TradeEntry};
use crate::solver::{Assignment, SolveStatus};

use super::PlanModel;

/// Read-only projection of a solved assignment onto plan entries
pub struct SolutionExtractor<'m, 'a> {
    plan_model: &'m PlanModel<'a>,
    assignment: &'m Assignment,
}

fn non_negative(value: i128) -> u128 {
    u128::try_from(value).unwrap_or(0)
}

fn count(value: i128) -> u64 {
    u64::try_from(non_negative(value)).unwrap_or(u64::MAX)
}

impl<'m, 'a> SolutionExtractor<'m, 'a> {
    pub fn new(plan_model: &'m PlanModel<'a>, assignment: &'m Assignment) -> Self {
        Self { plan_model, assignment }
    }

    pub fn total_cost(&self) -> u128 {
        non_negative(self.assignment.evaluate(&self.plan_model.total_cost))
    }

    pub fn trades(&self) -> Vec<TradeEntry> {
        self.plan_model
            .orders
            .iter()
            .filter_map(|node| node.decode(self.assignment))
            .collect()
    }

    pub fn crafts(&self) -> Vec<CraftEntry> {
        self.plan_model
            .recipes
            .iter()
            .filter_map(|node| node.decode(self.assignment))
            .collect()
    }

    pub fn leftovers(&self) -> Vec<ItemQuantity> {
        self.plan_model
            .items
            .iter()
            .filter_map(|node| {
                let qty = node.leftover_value(self.assignment);
                (qty > 0).then(|| ItemQuantity::new(node.item_id, count(qty)))
            })
            .collect()
    }

    pub fn item_costs(&self) -> Vec<(String, u128)> {
        self.plan_model
            .items
            .iter()
            .filter_map(|node| {
                let spent = self.assignment.evaluate(node.cost());
                (spent > 0).then(|| (node.item_id.to_string(), non_negative(spent)))
            })
            .collect()
    }

    pub fn extract(&self, status: SolveStatus) -> Plan {
        Plan {
            target: self.plan_model.target.clone(),
            total_cost: self.total_cost(),
            trades: self.trades(),
            crafts: self.crafts(),
            leftovers: self.leftovers(),
            item_costs: self.item_costs(),
            total_units_bought: count(self.assignment.evaluate(&self.plan_model.total_bought)),
            total_crafts: count(self.assignment.evaluate(&self.plan_model.total_crafts)),
            proven_optimal: status == SolveStatus::Optimal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::models::{Capacity, Catalog, MarketOrder, Recipe};
    use crate::plan::PlanBuilder;

    #[test]
    fn extracts_only_positive_entries() {
        let catalog = Catalog {
            items: vec!["gear".to_string(), "ore".to_string()],
            recipes: vec![Recipe::new(
                "smelt",
                ItemQuantity::new("gear", 4),
                vec![ItemQuantity::new("ore", 2)],
            )],
            orders: vec![
                MarketOrder::sell("ore_lot", "ore", Capacity::Unbounded, 1),
                MarketOrder::sell("gear_lot", "gear", Capacity::Unbounded, 50),
            ],
        };
        let builder = PlanBuilder::new(PlannerConfig::default()).unwrap();
        let pm = builder.build(&catalog, &ItemQuantity::new("gear", 13)).unwrap();

        // vars: smelt, ore_lot, gear_lot
        let assignment = Assignment::new(vec![4, 8, 0]);
        let plan = SolutionExtractor::new(&pm, &assignment).extract(SolveStatus::Feasible);

        assert_eq!(plan.total_cost, 8);
        assert_eq!(plan.trades.len(), 1);
        assert_eq!(plan.trades[0].trade_id, "ore_lot");
        assert_eq!(plan.crafts, vec![CraftEntry { recipe_id: "smelt".to_string(), count: 4 }]);
        assert_eq!(plan.leftovers, vec![ItemQuantity::new("gear", 3)]);
        assert_eq!(plan.item_costs, vec![("ore".to_string(), 8)]);
        assert_eq!(plan.total_units_bought, 8);
        assert_eq!(plan.total_crafts, 4);
        assert!(!plan.proven_optimal);
    }

    #[test]
    fn costs_beyond_64_bits_match_listed_trades() {
        let catalog = Catalog {
            items: vec!["gold".to_string()],
            recipes: vec![],
            orders: vec![
                MarketOrder::sell("vault_a", "gold", Capacity::Bounded(1), 5_000_000_000_000_000_000),
                MarketOrder::sell("vault_b", "gold", Capacity::Bounded(1), 6_000_000_000_000_000_000),
            ],
        };
        let builder = PlanBuilder::new(PlannerConfig::default()).unwrap();
        let pm = builder.build(&catalog, &ItemQuantity::new("gold", 2)).unwrap();

        let assignment = Assignment::new(vec![1, 1]);
        let plan = SolutionExtractor::new(&pm, &assignment).extract(SolveStatus::Optimal);

        assert_eq!(plan.total_cost, 11_000_000_000_000_000_000);
        assert_eq!(plan.total_cost, plan.trades.iter().map(|t| t.cost()).sum::<u128>());
        assert_eq!(plan.item_costs, vec![("gold".to_string(), 11_000_000_000_000_000_000)]);
        assert_eq!(plan.total_units_bought, 2);
    }
}
