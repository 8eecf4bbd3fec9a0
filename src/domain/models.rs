use std::fmt;

use super::value_objects::{
    BranchingRule, ConstraintType, NodeSelection, OptimizationType, RelaxationBackend,
    SolutionStatus, VariableType,
};

/// Stable identity of a decision variable: its position in the problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Whether the variable takes part in integrality tests and branching.
    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, coefficients: Vec<f64>) -> Self {
        Self {
            optimization_type,
            coefficients,
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self::new(OptimizationType::Maximize, coefficients)
    }

    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self::new(OptimizationType::Minimize, coefficients)
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Objective value of an assignment, in the caller's sense.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        dot(&self.coefficients, values)
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn less_equal(coefficients: Vec<f64>, bound: f64) -> Self {
        Self::new(ConstraintType::LessThanOrEqual, coefficients, bound)
    }

    pub fn greater_equal(coefficients: Vec<f64>, bound: f64) -> Self {
        Self::new(ConstraintType::GreaterThanOrEqual, coefficients, bound)
    }

    pub fn equal(coefficients: Vec<f64>, bound: f64) -> Self {
        Self::new(ConstraintType::Equal, coefficients, bound)
    }

    /// Single-variable constraint `var (op) bound` over `num_vars` variables.
    pub fn on_variable(
        var: VarId,
        num_vars: usize,
        constraint_type: ConstraintType,
        bound: f64,
    ) -> Self {
        let mut coefficients = vec![0.0; num_vars];
        coefficients[var.index()] = 1.0;
        Self::new(constraint_type, coefficients, bound)
            .with_name(format!("{} {} {}", var, constraint_type, bound))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Left-hand side value for an assignment.
    pub fn activity(&self, values: &[f64]) -> f64 {
        dot(&self.coefficients, values)
    }

    /// How far an assignment is from satisfying the constraint (0 when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.activity(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
        }
    }
}

/// Configuration for the branch-and-bound search
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: RelaxationBackend,
    /// Integrality and improvement tolerance
    pub tolerance: f64,
    /// Maximum number of subproblems taken off the frontier
    pub node_limit: Option<u64>,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    pub branching_rule: BranchingRule,
    pub node_selection: NodeSelection,
    /// Discard subproblems whose bound cannot beat the incumbent
    pub pruning: bool,
    /// Concurrent relaxation solves in the parallel engine
    pub threads: usize,
    pub verbose: bool,
}

impl SolverConfig {
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    pub fn with_backend(mut self, backend: RelaxationBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_branching_rule(mut self, rule: BranchingRule) -> Self {
        self.branching_rule = rule;
        self
    }

    pub fn with_node_selection(mut self, selection: NodeSelection) -> Self {
        self.node_selection = selection;
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: RelaxationBackend::Auto,
            tolerance: Self::DEFAULT_TOLERANCE,
            node_limit: None,
            time_limit: None,
            branching_rule: BranchingRule::default(),
            node_selection: NodeSelection::default(),
            pruning: true,
            threads: 4,
            verbose: false,
        }
    }
}

/// Complete mixed-integer linear program
#[derive(Debug, Clone)]
pub struct MilpProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl MilpProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }
}

/// Statistics about the search
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    /// Relaxations solved
    pub nodes_explored: u64,
    pub nodes_created: u64,
    pub nodes_pruned: u64,
    pub nodes_infeasible: u64,
    pub nodes_branched: u64,
    pub incumbent_updates: u64,
    pub max_depth: usize,
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    /// Measure an assignment against the original problem, bounds included.
    pub fn measure(problem: &MilpProblem, values: &[f64]) -> Self {
        let row_violation = problem
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max);

        let bound_violation = problem
            .variables
            .iter()
            .zip(values)
            .map(|(var, &value)| {
                let below = (var.lower_bound - value).max(0.0);
                let above = var.upper_bound.map_or(0.0, |ub| (value - ub).max(0.0));
                below.max(above)
            })
            .fold(0.0, f64::max);

        let max_integrality_violation = problem
            .variables
            .iter()
            .zip(values)
            .filter(|(var, _)| var.is_integer())
            .map(|(_, &value)| (value - value.round()).abs())
            .fold(0.0, f64::max);

        Self {
            max_constraint_violation: row_violation.max(bound_violation),
            max_integrality_violation,
        }
    }
}

/// Solution to a mixed-integer program
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    /// Objective value of the best integral solution, in the caller's sense
    pub optimal_value: Option<f64>,
    /// Best bound on the optimum still possible when the search stopped
    pub best_bound: Option<f64>,
    pub gap: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            best_bound: None,
            gap: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            best_bound: Some(value),
            gap: Some(0.0),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// An integral assignment is available (optimal or best-so-far).
    pub fn is_feasible(&self) -> bool {
        self.optimal_value.is_some()
    }

    pub fn value_of(&self, var: VarId) -> Option<f64> {
        self.variable_values.get(var.index()).copied()
    }
}

pub(crate) fn dot(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients.iter().zip(values).map(|(c, v)| c * v).sum()
}
