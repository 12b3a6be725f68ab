//! Planner configuration

use crate::error::{PlanError, PlanResult};

/// Stand-in upper bound for "unbounded" quantities
pub const DEFAULT_EFFECTIVE_INFINITY: i64 = 1_000_000_000;

/// Settings fixed for the lifetime of a planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Finite ceiling substituted for unbounded capacities and craft counts.
    pub effective_infinity: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            effective_infinity: DEFAULT_EFFECTIVE_INFINITY,
        }
    }
}

impl PlannerConfig {
    pub fn with_effective_infinity(effective_infinity: i64) -> Self {
        Self { effective_infinity }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.effective_infinity <= 0 {
            return Err(PlanError::InvalidConfig(format!(
                "effective infinity must be positive, got {}",
                self.effective_infinity
            )));
        }
        Ok(())
    }
}
