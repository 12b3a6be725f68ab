//! Entry point for planning requests against a fixed catalog

use tracing::info;

use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::models::{Catalog, ItemQuantity, Plan};
use crate::plan::PlanBuilder;
use crate::solver::{MicrolpEngine, SolverEngine};

/// Answers `plan(target)` requests. Every request builds and solves a fresh model.
pub struct Planner {
    catalog: Catalog,
    builder: PlanBuilder,
    engine: Box<dyn SolverEngine>,
}

impl Planner {
    /// Planner backed by the bundled microlp engine
    pub fn new(catalog: Catalog, config: PlannerConfig) -> PlanResult<Self> {
        Self::with_engine(catalog, config, Box::new(MicrolpEngine::new()))
    }

    pub fn with_engine(catalog: Catalog, config: PlannerConfig, engine: Box<dyn SolverEngine>) -> PlanResult<Self> {
        Ok(Self {
            catalog,
            builder: PlanBuilder::new(config)?,
            engine,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        self.builder.config()
    }

    /// Cheapest way to end up with `target`, or why there is none
    pub fn plan(&self, target: &ItemQuantity) -> PlanResult<Plan> {
        info!(target_item = %target.item_id, quantity = target.quantity, engine = self.engine.name(), "planning");

        let plan_model = self.builder.build(&self.catalog, target)?;
        let result = plan_model.solve(self.engine.as_ref());

        match &result {
            Ok(plan) => info!(
                total_cost = %plan.total_cost,
                trades = plan.trades.len(),
                crafts = plan.crafts.len(),
                "plan found"
            ),
            Err(PlanError::Infeasible { .. }) => info!("no feasible plan"),
            Err(e) => info!(error = %e, "planning failed"),
        }

        result
    }
}
