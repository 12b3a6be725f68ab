//! Planning error types

use thiserror::Error;

/// Everything a planning request can fail with. No variant ever carries a partial plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A recipe, order or target names an item outside the known item set.
    #[error("{context} references unknown item '{item}'")]
    UnknownItem { context: String, item: String },

    #[error("item '{0}' is defined more than once")]
    DuplicateItem(String),

    #[error("recipe '{0}' is defined more than once")]
    DuplicateRecipe(String),

    #[error("market order '{0}' is defined more than once")]
    DuplicateOrder(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A price or quantity, scaled by its variable's upper bound, leaves the 64-bit model range.
    #[error("{context}: {value} x {bound} does not fit in a model coefficient")]
    QuantityOverflow { context: String, value: u64, bound: i64 },

    /// Supply can't be made to cover demand for every item at once.
    #[error("no feasible plan produces {quantity} of '{target}'")]
    Infeasible { target: String, quantity: u64 },

    #[error("solver '{engine}' rejected the model: {detail}")]
    ModelInvalid { engine: String, detail: String },

    #[error("solver '{engine}' could not determine a result: {detail}")]
    Unknown { engine: String, detail: String },
}

impl PlanError {
    /// True for errors caused by the request data itself, detected before solving
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            PlanError::UnknownItem { .. }
                | PlanError::DuplicateItem(_)
                | PlanError::DuplicateRecipe(_)
                | PlanError::DuplicateOrder(_)
                | PlanError::InvalidTarget(_)
                | PlanError::InvalidConfig(_)
                | PlanError::QuantityOverflow { .. }
        )
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
