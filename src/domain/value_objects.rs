// Domain value objects representing core search concepts

use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanOrEqual => write!(f, "<="),
            ConstraintType::Equal => write!(f, "=="),
            ConstraintType::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

impl OptimizationType {
    /// Factor that turns the objective into a maximization objective.
    pub fn sign(self) -> f64 {
        match self {
            OptimizationType::Maximize => 1.0,
            OptimizationType::Minimize => -1.0,
        }
    }
}

/// Status of the optimization solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal integral solution
    Optimal,
    /// No feasible integral solution exists
    Infeasible,
    /// The root relaxation is unbounded
    Unbounded,
    /// Time limit reached
    TimeLimit,
    /// Node limit reached
    NodeLimit,
    /// Solve interrupted by the caller
    Interrupted,
}

impl SolutionStatus {
    /// The search stopped on a budget or a stop request before exhausting the frontier.
    pub fn is_budget_exceeded(self) -> bool {
        matches!(
            self,
            SolutionStatus::TimeLimit | SolutionStatus::NodeLimit | SolutionStatus::Interrupted
        )
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::NodeLimit => write!(f, "Node Limit Reached"),
            SolutionStatus::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// LP engine used for the relaxations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationBackend {
    /// Automatically select the first compiled-in backend
    Auto,
    /// Pure-Rust simplex shipped with good_lp
    MicroLp,
    /// COIN-OR CBC
    CoinCbc,
    /// HiGHS
    Highs,
}

impl fmt::Display for RelaxationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationBackend::Auto => write!(f, "Auto"),
            RelaxationBackend::MicroLp => write!(f, "microlp"),
            RelaxationBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            RelaxationBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

/// Branching variable selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchingRule {
    /// First fractional integer variable in declaration order
    #[default]
    FirstFractional,
    /// Variable whose fractional part is closest to 0.5
    MostFractional,
}

/// Order in which the frontier hands out subproblems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Highest inherited relaxation bound first
    #[default]
    BestBound,
    /// Deepest subproblem first
    DepthFirst,
}
