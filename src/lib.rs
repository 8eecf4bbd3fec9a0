// Domain layer: problem model, relaxation boundary and service contract
pub mod domain;

// Application layer: the branch-and-bound search
pub mod application;

// Relaxation adapters: concrete LP engines behind RelaxationSolver
pub mod solver;

// Re-export commonly used types
pub use domain::{
    BranchingRule, Constraint, ConstraintType, MilpProblem, NodeSelection, ObjectiveFunction,
    OptimizationType, Relaxation, RelaxationBackend, RelaxationOutcome, RelaxationSolver, Solution,
    SolutionQuality, SolutionStatus, SolverConfig, SolverError, SolverService, SolverStatistics,
    VarId, Variable, VariableType,
};

pub use application::{BranchAndBound, ParallelBranchAndBound, StopHandle};

pub use solver::RelaxationFactory;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcRelaxation;
#[cfg(feature = "highs")]
pub use solver::HighsRelaxation;
#[cfg(feature = "microlp")]
pub use solver::MicroLpRelaxation;

/// Solve a problem with the sequential engine and the configured LP backend
pub fn solve(problem: &MilpProblem) -> domain::Result<Solution> {
    let relaxation = RelaxationFactory::create(problem.solver_config.backend)?;
    BranchAndBound::new(relaxation).solve(problem)
}
