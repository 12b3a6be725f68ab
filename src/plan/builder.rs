//! Catalog validation and integer-program assembly

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::models::{Capacity, Catalog, ItemQuantity, OrderSide, Plan};
use crate::solver::{LinearExpr, Model, SolveStatus, SolverEngine};

use super::{
    coeff, ItemBalanceNode, ItemLinks, MarketOrderNode, NodeArena, OrderRef, RecipeNode, RecipeRef, SolutionExtractor,
};

/// `value * bound` must be representable as an `i64` coefficient
fn check_scaled(context: impl FnOnce() -> String, value: u64, bound: i64) -> PlanResult<()> {
    i64::try_from(value)
        .ok()
        .and_then(|v| v.checked_mul(bound))
        .map(|_| ())
        .ok_or_else(|| PlanError::QuantityOverflow {
            context: context(),
            value,
            bound,
        })
}

/// Assembles one integer program per planning request
#[derive(Debug, Clone, Copy)]
pub struct PlanBuilder {
    config: PlannerConfig,
}

/// A fully assembled, not yet solved planning model
#[derive(Debug)]
pub struct PlanModel<'a> {
    pub target: ItemQuantity,
    pub model: Model,
    pub orders: Vec<MarketOrderNode<'a>>,
    pub recipes: Vec<RecipeNode<'a>>,
    pub items: Vec<ItemBalanceNode<'a>>,
    pub total_cost: LinearExpr,
    pub total_bought: LinearExpr,
    pub total_crafts: LinearExpr,
}

impl PlanBuilder {
    pub fn new(config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Check the request is structurally sound before any variable is created
    pub fn validate(&self, catalog: &Catalog, target: &ItemQuantity) -> PlanResult<()> {
        let inf = self.config.effective_infinity;
        let mut known = HashSet::new();
        for item in &catalog.items {
            if !known.insert(item.as_str()) {
                return Err(PlanError::DuplicateItem(item.clone()));
            }
        }

        let mut recipe_ids = HashSet::new();
        for recipe in &catalog.recipes {
            if !recipe_ids.insert(recipe.recipe_id.as_str()) {
                return Err(PlanError::DuplicateRecipe(recipe.recipe_id.clone()));
            }
            if !known.contains(recipe.produced.item_id.as_str()) {
                return Err(PlanError::UnknownItem {
                    context: format!("recipe '{}' output", recipe.recipe_id),
                    item: recipe.produced.item_id.clone(),
                });
            }
            for consumed in recipe.consumed() {
                if !known.contains(consumed.item_id.as_str()) {
                    return Err(PlanError::UnknownItem {
                        context: format!("recipe '{}' input", recipe.recipe_id),
                        item: consumed.item_id.clone(),
                    });
                }
            }

            check_scaled(
                || format!("recipe '{}' output quantity", recipe.recipe_id),
                recipe.produced.quantity,
                inf,
            )?;
            for (item_id, qty) in recipe.consumed_items() {
                check_scaled(
                    || format!("recipe '{}' input '{}'", recipe.recipe_id, item_id),
                    qty,
                    inf,
                )?;
            }
        }

        let mut trade_ids = HashSet::new();
        for order in &catalog.orders {
            if !trade_ids.insert(order.trade_id.as_str()) {
                return Err(PlanError::DuplicateOrder(order.trade_id.clone()));
            }
            if !known.contains(order.item_id.as_str()) {
                return Err(PlanError::UnknownItem {
                    context: format!("market order '{}'", order.trade_id),
                    item: order.item_id.clone(),
                });
            }

            if order.side == OrderSide::Sell {
                if let Capacity::Bounded(n) = order.capacity {
                    check_scaled(|| format!("market order '{}' capacity", order.trade_id), n, 1)?;
                }
                check_scaled(
                    || format!("market order '{}' unit price", order.trade_id),
                    order.unit_price,
                    order.capacity.resolve(inf),
                )?;
            }
        }

        if !known.contains(target.item_id.as_str()) {
            return Err(PlanError::UnknownItem {
                context: "target".to_string(),
                item: target.item_id.clone(),
            });
        }
        if target.quantity == 0 {
            return Err(PlanError::InvalidTarget(format!(
                "quantity of '{}' must be positive",
                target.item_id
            )));
        }
        check_scaled(|| "target quantity".to_string(), target.quantity, 1)?;

        Ok(())
    }

    /// Validate, then create every variable and constraint for `target`
    pub fn build<'a>(&self, catalog: &'a Catalog, target: &ItemQuantity) -> PlanResult<PlanModel<'a>> {
        self.validate(catalog, target)?;

        let inf = self.config.effective_infinity;
        let mut model = Model::new();

        let recipes: Vec<RecipeNode<'a>> = catalog
            .recipes
            .iter()
            .map(|recipe| RecipeNode::new(&mut model, recipe, inf))
            .collect();
        let orders: Vec<MarketOrderNode<'a>> = catalog
            .orders
            .iter()
            .map(|order| MarketOrderNode::new(&mut model, order, inf))
            .collect();

        let mut producing: HashMap<&str, Vec<RecipeRef>> = HashMap::new();
        let mut consuming: HashMap<&str, Vec<RecipeRef>> = HashMap::new();
        for (idx, node) in recipes.iter().enumerate() {
            producing
                .entry(node.recipe.produced.item_id.as_str())
                .or_default()
                .push(RecipeRef(idx));
            for (item_id, _) in node.recipe.consumed_items() {
                consuming.entry(item_id).or_default().push(RecipeRef(idx));
            }
        }

        let mut selling: HashMap<&str, Vec<OrderRef>> = HashMap::new();
        let mut ignored_buy_orders = 0usize;
        for (idx, node) in orders.iter().enumerate() {
            match node.order.side {
                OrderSide::Sell => selling
                    .entry(node.order.item_id.as_str())
                    .or_default()
                    .push(OrderRef(idx)),
                OrderSide::Buy => ignored_buy_orders += 1,
            }
        }
        if ignored_buy_orders > 0 {
            warn!(
                count = ignored_buy_orders,
                "market buy orders are not used for planning yet; ignoring them"
            );
        }

        let arena = NodeArena {
            orders: &orders,
            recipes: &recipes,
        };
        let items: Vec<ItemBalanceNode<'a>> = catalog
            .items
            .iter()
            .map(|item_id| {
                let key = item_id.as_str();
                let demand = if key == target.item_id {
                    coeff(target.quantity)
                } else {
                    0
                };
                let links = ItemLinks {
                    sell_orders: selling.remove(key).unwrap_or_default(),
                    producing: producing.remove(key).unwrap_or_default(),
                    consuming: consuming.remove(key).unwrap_or_default(),
                };
                ItemBalanceNode::new(&mut model, key, demand, arena, links)
            })
            .collect();

        let mut total_cost = LinearExpr::new();
        let mut total_bought = LinearExpr::new();
        for node in orders.iter().filter(|o| o.is_sell()) {
            total_cost.add_expr(&node.trade_value());
            total_bought.add_expr(&node.quantity());
        }
        let total_crafts = LinearExpr::sum(recipes.iter().map(|r| (r.var(), 1)));

        model.minimize(total_cost.clone());

        debug!(
            request = %target,
            items = items.len(),
            recipes = recipes.len(),
            orders = orders.len(),
            vars = model.vars().len(),
            constraints = model.constraints().len(),
            "assembled planning model"
        );

        Ok(PlanModel {
            target: target.clone(),
            model,
            orders,
            recipes,
            items,
            total_cost,
            total_bought,
            total_crafts,
        })
    }
}

impl PlanModel<'_> {
    /// Hand the model to `engine` once and decode the result.
    ///
    /// Ties between equally cheap plans are broken by the engine, so the
    /// chosen trades and crafts may differ between engines or versions;
    /// the total cost does not.
    pub fn solve(&self, engine: &dyn SolverEngine) -> PlanResult<Plan> {
        let outcome = engine.solve(&self.model);

        match (outcome.status, outcome.assignment) {
            (status @ (SolveStatus::Optimal | SolveStatus::Feasible), Some(assignment)) => {
                Ok(SolutionExtractor::new(self, &assignment).extract(status))
            }
            (SolveStatus::Optimal | SolveStatus::Feasible, None) => Err(PlanError::Unknown {
                engine: engine.name().to_string(),
                detail: format!("{} reported without an assignment", outcome.status),
            }),
            (SolveStatus::Infeasible, _) => Err(PlanError::Infeasible {
                target: self.target.item_id.clone(),
                quantity: self.target.quantity,
            }),
            (SolveStatus::ModelInvalid, _) => Err(PlanError::ModelInvalid {
                engine: engine.name().to_string(),
                detail: outcome.detail,
            }),
            (SolveStatus::Unknown, _) => Err(PlanError::Unknown {
                engine: engine.name().to_string(),
                detail: outcome.detail,
            }),
        }
    }
}
