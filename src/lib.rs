//! Minimum-cost production planning
//!
//! Given items, recipes and tiered market orders, find how much to buy from
//! which order and how often to run which recipe so that a target quantity is
//! met at the lowest total spend. The problem is assembled as an integer
//! program ([`plan::PlanBuilder`]), handed to a [`solver::SolverEngine`], and
//! the assignment is decoded back into a [`models::Plan`].

pub mod calculator;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod plan;
pub mod planner;
pub mod sample;
pub mod solver;

pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult};
pub use models::{Capacity, Catalog, CraftEntry, ItemQuantity, MarketOrder, OrderSide, Plan, Recipe, TradeEntry};
pub use planner::Planner;
