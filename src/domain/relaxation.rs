// Boundary to the LP engine that solves the continuous relaxations
// The search only sees this trait; concrete engines live in `crate::solver`

use super::models::{dot, Constraint, Variable};
use super::solver_service::Result;

/// One LP relaxation handed to the LP engine.
///
/// The objective is always maximized. Integrality is never part of a relaxation:
/// variables keep their bounds, their type is ignored.
#[derive(Debug, Clone)]
pub struct Relaxation<'a> {
    pub variables: &'a [Variable],
    pub objective: &'a [f64],
    pub constraints: Vec<&'a Constraint>,
}

impl<'a> Relaxation<'a> {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of an assignment under this relaxation's objective.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        dot(self.objective, values)
    }
}

/// What the LP engine reports for a relaxation
#[derive(Debug, Clone, PartialEq)]
pub enum RelaxationOutcome {
    Optimal {
        objective_value: f64,
        values: Vec<f64>,
    },
    Infeasible,
    Unbounded,
}

/// LP engine used to solve relaxations
///
/// Implementations must be deterministic for identical input. Errors are reserved
/// for engine failures; infeasibility and unboundedness are outcomes.
pub trait RelaxationSolver: Send + Sync {
    fn solve_relaxation(&self, relaxation: &Relaxation<'_>) -> Result<RelaxationOutcome>;

    fn name(&self) -> &str;
}

impl<T: RelaxationSolver + ?Sized> RelaxationSolver for std::sync::Arc<T> {
    fn solve_relaxation(&self, relaxation: &Relaxation<'_>) -> Result<RelaxationOutcome> {
        (**self).solve_relaxation(relaxation)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
