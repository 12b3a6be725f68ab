//! Integer-program model and the engine interface that solves it
//!
//! A [`Model`] is plain data: bounded integer variables, linear constraints
//! and one minimization objective. Engines implementing [`SolverEngine`]
//! receive the finished model once and hand back a [`SolveOutcome`].

mod milp;

use std::fmt;

pub use milp::MicrolpEngine;

/// Handle to an integer variable inside one [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Integer-weighted sum of variables plus a constant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coeff: i64) -> Self {
        let mut expr = Self::new();
        expr.add_term(var, coeff);
        expr
    }

    /// Sum of `(var, coeff)` pairs
    pub fn sum<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (VarId, i64)>,
    {
        let mut expr = Self::new();
        for (var, coeff) in terms {
            expr.add_term(var, coeff);
        }
        expr
    }

    pub fn add_term(&mut self, var: VarId, coeff: i64) {
        if coeff == 0 {
            return;
        }
        match self.terms.iter_mut().find(|(v, _)| *v == var) {
            Some((_, c)) => {
                *c = c.saturating_add(coeff);
                if *c == 0 {
                    self.terms.retain(|(v, _)| *v != var);
                }
            }
            None => self.terms.push((var, coeff)),
        }
    }

    pub fn add_expr(&mut self, other: &LinearExpr) {
        for &(var, coeff) in &other.terms {
            self.add_term(var, coeff);
        }
        self.constant = self.constant.saturating_add(other.constant);
    }

    pub fn sub_expr(&mut self, other: &LinearExpr) {
        self.add_expr(&other.scaled(-1));
    }

    pub fn add_constant(&mut self, value: i64) {
        self.constant = self.constant.saturating_add(value);
    }

    pub fn scaled(&self, factor: i64) -> LinearExpr {
        if factor == 0 {
            return LinearExpr::new();
        }
        LinearExpr {
            terms: self.terms.iter().map(|&(v, c)| (v, c.saturating_mul(factor))).collect(),
            constant: self.constant.saturating_mul(factor),
        }
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant_part(&self) -> i64 {
        self.constant
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Ge,
    Le,
    Eq,
}

impl Comparison {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
        }
    }
}

/// `expr <cmp> rhs`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub expr: LinearExpr,
    pub cmp: Comparison,
    pub rhs: i64,
}

#[derive(Debug, Clone)]
pub struct IntVar {
    pub name: String,
    pub lower: i64,
    pub upper: i64,
}

/// Variables, constraints and objective for a single solve
#[derive(Debug, Clone, Default)]
pub struct Model {
    vars: Vec<IntVar>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an integer variable with inclusive bounds
    pub fn new_int_var(&mut self, lower: i64, upper: i64, name: impl Into<String>) -> VarId {
        self.vars.push(IntVar {
            name: name.into(),
            lower,
            upper,
        });
        VarId(self.vars.len() - 1)
    }

    pub fn add_constraint(&mut self, expr: LinearExpr, cmp: Comparison, rhs: i64) {
        self.constraints.push(Constraint { expr, cmp, rhs });
    }

    /// Set the expression to minimize, replacing any previous objective
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.objective = expr;
    }

    pub fn vars(&self) -> &[IntVar] {
        &self.vars
    }

    pub fn var(&self, id: VarId) -> &IntVar {
        &self.vars[id.0]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

impl SolveStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
            SolveStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Variable values of one solved model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: VarId) -> i64 {
        self.values.get(var.0).copied().unwrap_or(0)
    }

    /// Value of `expr` under this assignment, accumulated in 128 bits
    pub fn evaluate(&self, expr: &LinearExpr) -> i128 {
        expr.terms
            .iter()
            .map(|&(var, coeff)| i128::from(self.value(var)) * i128::from(coeff))
            .sum::<i128>()
            + i128::from(expr.constant)
    }
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Present only when `status` is Optimal or Feasible.
    pub assignment: Option<Assignment>,
    pub detail: String,
}

impl SolveOutcome {
    pub fn solved(status: SolveStatus, assignment: Assignment) -> Self {
        Self {
            status,
            assignment: Some(assignment),
            detail: String::new(),
        }
    }

    pub fn failed(status: SolveStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            assignment: None,
            detail: detail.into(),
        }
    }
}

/// Anything that can minimize a [`Model`]. Called once per model, synchronously.
pub trait SolverEngine {
    fn name(&self) -> &str;

    fn solve(&self, model: &Model) -> SolveOutcome;
}
