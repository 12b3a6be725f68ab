//! Translation of a catalog and target into an integer program, and back
//!
//! [`PlanBuilder`] owns the arena of [`MarketOrderNode`]s and [`RecipeNode`]s;
//! each [`ItemBalanceNode`] refers into that arena through [`OrderRef`] and
//! [`RecipeRef`] and contributes one balance constraint. After the solve,
//! [`SolutionExtractor`] projects the assignment onto a [`crate::models::Plan`].

mod builder;
mod item_balance;
mod market_order;
mod recipe_node;
mod solution;

pub use builder::{PlanBuilder, PlanModel};
pub use item_balance::{ItemBalanceNode, ItemLinks, NodeArena};
pub use market_order::MarketOrderNode;
pub use recipe_node::RecipeNode;
pub use solution::SolutionExtractor;

/// Position of a market order node in the builder's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderRef(pub(crate) usize);

/// Position of a recipe node in the builder's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecipeRef(pub(crate) usize);

/// Integer coefficient for a catalog quantity, saturating on overflow.
/// `PlanBuilder::validate` rejects catalogs where this would saturate.
pub(crate) fn coeff(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
