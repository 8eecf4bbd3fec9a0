// Domain service interface for solving mixed-integer programs
// Defines the contract that any search engine implementation must follow

use super::models::{MilpProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Relaxation of subproblem {node_id} is unbounded below the root")]
    RelaxationUnbounded { node_id: u64 },

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for mixed-integer solvers
///
/// Both the sequential and the parallel branch-and-bound engines implement this,
/// so callers can swap them without changing problem construction.
pub trait SolverService: Send + Sync {
    /// Solve a mixed-integer program
    fn solve(&self, problem: &MilpProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &MilpProblem) -> Result<Vec<String>> {
        let mut errors = Vec::new();

        // Check objective has coefficients
        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }
        if problem.objective.coefficients.iter().any(|c| !c.is_finite()) {
            errors.push("Objective coefficients must be finite".to_string());
        }

        let num_vars = problem.num_variables();

        // Check variables match objective
        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        // Check constraints
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} has {} coefficients but problem has {} variables",
                    i,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            if !constraint.bound.is_finite()
                || constraint.coefficients.iter().any(|c| !c.is_finite())
            {
                errors.push(format!("Constraint {} has non-finite data", i));
            }
        }

        // Check variable bounds
        for (i, var) in problem.variables.iter().enumerate() {
            if var.lower_bound.is_nan() {
                errors.push(format!("Variable {} '{}' has a NaN lower bound", i, var.name));
            }
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        // Check search configuration
        let config = &problem.solver_config;
        if !(config.tolerance > 0.0 && config.tolerance < 0.5) {
            errors.push(format!(
                "Tolerance must lie in (0, 0.5), got {}",
                config.tolerance
            ));
        }
        if let Some(limit) = config.time_limit {
            if !(limit >= 0.0) {
                errors.push(format!("Time limit must be non-negative, got {}", limit));
            }
        }
        if config.threads == 0 {
            errors.push("Thread count must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(Vec::new())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
