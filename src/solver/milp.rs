//! Adapter from [`Model`] to the pure-Rust `microlp` MILP solver

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use tracing::debug;

use super::{Assignment, Comparison, Model, SolveOutcome, SolveStatus, SolverEngine};

/// Branch-and-bound over microlp's simplex relaxation
#[derive(Debug, Default, Clone, Copy)]
pub struct MicrolpEngine;

impl MicrolpEngine {
    pub fn new() -> Self {
        Self
    }
}

fn to_i32(value: i64) -> Option<i32> {
    i32::try_from(value).ok()
}

fn comparison_op(cmp: Comparison) -> ComparisonOp {
    match cmp {
        Comparison::Ge => ComparisonOp::Ge,
        Comparison::Le => ComparisonOp::Le,
        Comparison::Eq => ComparisonOp::Eq,
    }
}

impl SolverEngine for MicrolpEngine {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, model: &Model) -> SolveOutcome {
        let mut obj_coeffs = vec![0.0; model.vars().len()];
        for &(var, coeff) in model.objective().terms() {
            obj_coeffs[var.index()] += coeff as f64;
        }

        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let mut handles: Vec<Variable> = Vec::with_capacity(model.vars().len());

        for (var, obj_coeff) in model.vars().iter().zip(obj_coeffs) {
            if var.lower > var.upper {
                return SolveOutcome::failed(
                    SolveStatus::ModelInvalid,
                    format!("variable {} has empty domain [{}, {}]", var.name, var.lower, var.upper),
                );
            }
            let (Some(lower), Some(upper)) = (to_i32(var.lower), to_i32(var.upper)) else {
                return SolveOutcome::failed(
                    SolveStatus::ModelInvalid,
                    format!(
                        "bounds [{}, {}] of variable {} exceed the 32-bit integer range",
                        var.lower, var.upper, var.name
                    ),
                );
            };
            handles.push(problem.add_integer_var(obj_coeff, (lower, upper)));
        }

        let mut submitted = 0usize;
        for constraint in model.constraints() {
            // Constants move to the right-hand side
            let rhs = constraint.rhs.saturating_sub(constraint.expr.constant_part());

            if constraint.expr.is_constant() {
                if constraint.cmp.holds(0, rhs) {
                    continue;
                }
                return SolveOutcome::failed(SolveStatus::Infeasible, "constant constraint is violated");
            }

            let terms: Vec<(Variable, f64)> = constraint
                .expr
                .terms()
                .iter()
                .map(|&(var, coeff)| (handles[var.index()], coeff as f64))
                .collect();
            problem.add_constraint(terms.as_slice(), comparison_op(constraint.cmp), rhs as f64);
            submitted += 1;
        }

        debug!(
            vars = handles.len(),
            constraints = submitted,
            "submitting model to microlp"
        );

        match problem.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|&h| solution[h].round() as i64).collect();
                SolveOutcome::solved(SolveStatus::Optimal, Assignment::new(values))
            }
            Err(microlp::Error::Infeasible) => {
                SolveOutcome::failed(SolveStatus::Infeasible, "no assignment satisfies every constraint")
            }
            Err(other) => SolveOutcome::failed(SolveStatus::Unknown, format!("{:?}", other)),
        }
    }
}
