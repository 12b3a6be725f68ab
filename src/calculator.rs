//! Planning against the stored catalog, and plan rendering

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::PlannerConfig;
use crate::db;
use crate::error::PlanResult;
use crate::models::{ItemQuantity, Plan};
use crate::planner::Planner;

/// Load the catalog from the database and plan for `target`.
///
/// The outer `Result` covers catalog loading; the inner one is the planning
/// outcome, so callers can tell "no feasible plan" apart from I/O trouble.
pub fn calculate_plan(
    conn: &Connection,
    target: &ItemQuantity,
    config: PlannerConfig,
) -> Result<PlanResult<Plan>> {
    let catalog = db::load_catalog(conn).context("Failed to load catalog")?;
    let planner = match Planner::new(catalog, config) {
        Ok(planner) => planner,
        Err(e) => return Ok(Err(e)),
    };
    Ok(planner.plan(target))
}

/// Human-readable view of a plan
pub struct PlanSummary<'a> {
    pub plan: &'a Plan,
    pub verbose: bool,
}

impl<'a> PlanSummary<'a> {
    pub fn new(plan: &'a Plan, verbose: bool) -> Self {
        Self { plan, verbose }
    }
}

impl std::fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plan = self.plan;

        writeln!(f, "=== Plan Summary ===")?;
        writeln!(f, "Target: {} x{}", plan.target.item_id, plan.target.quantity)?;
        writeln!(f, "Total cost: {}", plan.total_cost)?;
        writeln!(f)?;

        writeln!(f, "{:<10} {:<36} {:>10} {:>10}", "Step", "Detail", "Qty", "Cost")?;
        writeln!(f, "{}", "-".repeat(69))?;
        for t in &plan.trades {
            writeln!(
                f,
                "{:<10} {:<36} {:>10} {:>10}",
                "buy",
                format!("{}@{}", t.item_id, t.trade_id),
                t.quantity,
                t.cost()
            )?;
        }
        for c in &plan.crafts {
            writeln!(f, "{:<10} {:<36} {:>10} {:>10}", "craft", c.recipe_id, c.count, "")?;
        }
        for l in &plan.leftovers {
            writeln!(f, "{:<10} {:<36} {:>10} {:>10}", "leftover", l.item_id, l.quantity, "")?;
        }

        if self.verbose {
            writeln!(f)?;
            writeln!(f, "Spend by item:")?;
            for (item, cost) in &plan.item_costs {
                writeln!(f, "  {:<36} {:>10}", item, cost)?;
            }
            writeln!(f)?;
            writeln!(f, "Units bought: {}", plan.total_units_bought)?;
            writeln!(f, "Crafts run:   {}", plan.total_crafts)?;
            if !plan.proven_optimal {
                writeln!(f, "(solver returned a feasible plan without proving optimality)")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::sample::sample_catalog;

    fn sample_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::store_catalog(&conn, &sample_catalog()).unwrap();
        conn
    }

    #[test]
    fn plans_from_the_stored_catalog() {
        let conn = sample_db();
        let target = ItemQuantity::new("minecraft:iron_sword", 13);
        let plan = calculate_plan(&conn, &target, PlannerConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(plan.total_cost, 664);

        let rendered = PlanSummary::new(&plan, true).to_string();
        assert!(rendered.contains("Total cost: 664"));
        assert!(rendered.contains("iron_sword"));
        assert!(rendered.contains("leftover"));
        assert!(rendered.contains("Units bought:"));
    }

    #[test]
    fn planning_errors_are_returned_not_raised() {
        let conn = sample_db();
        let target = ItemQuantity::new("minecraft:diamond", 1);
        let outcome = calculate_plan(&conn, &target, PlannerConfig::default()).unwrap();

        assert!(matches!(outcome, Err(PlanError::UnknownItem { .. })));
    }
}
