#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use letsmip::{
    Constraint, MilpProblem, ObjectiveFunction, Relaxation, RelaxationOutcome, RelaxationSolver,
    Solution, SolverError, StopHandle, Variable,
};

/// Maximize x + y s.t. x + 2y <= 4, 4x + 2y <= 12, x, y >= 0 integral.
pub fn two_variable_problem() -> MilpProblem {
    MilpProblem::new(ObjectiveFunction::maximize(vec![1.0, 1.0]))
        .with_name("two-variable")
        .with_variables(vec![Variable::integer("x"), Variable::integer("y")])
        .add_constraint(Constraint::less_equal(vec![1.0, 2.0], 4.0))
        .add_constraint(Constraint::less_equal(vec![4.0, 2.0], 12.0))
}

/// 0/1 knapsack: 5 items, 15 kg capacity.
pub fn knapsack() -> MilpProblem {
    let weights = vec![7.0, 3.0, 4.0, 5.0, 2.0];
    let values = vec![150.0, 90.0, 120.0, 100.0, 80.0];
    let items = ["Tent", "Stove", "Food", "Water", "Camera"];

    MilpProblem::new(ObjectiveFunction::maximize(values))
        .with_name("Knapsack Problem")
        .with_description("0/1 Knapsack with 5 items and 15 kg capacity")
        .with_variables(items.iter().map(|name| Variable::binary(*name)).collect())
        .add_constraint(Constraint::less_equal(weights, 15.0).with_name("Weight capacity"))
}

/// Every variable of the assignment that should be integral is, and all rows hold.
pub fn assert_integral_and_feasible(problem: &MilpProblem, solution: &Solution) {
    assert_eq!(solution.variable_values.len(), problem.variables.len());
    for (var, value) in problem.variables.iter().zip(&solution.variable_values) {
        if var.is_integer() {
            assert_eq!(value.fract(), 0.0, "{} = {} is not integral", var.name, value);
        }
    }
    for constraint in &problem.constraints {
        assert!(
            constraint.violation(&solution.variable_values) < 1e-6,
            "constraint {:?} violated by {:?}",
            constraint,
            solution.variable_values
        );
    }
}

/// Wraps a relaxation solver and counts the relaxations it solves.
pub struct Counting<R> {
    inner: R,
    calls: AtomicU64,
}

impl<R> Counting<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<R: RelaxationSolver> RelaxationSolver for Counting<R> {
    fn solve_relaxation(
        &self,
        relaxation: &Relaxation<'_>,
    ) -> Result<RelaxationOutcome, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.solve_relaxation(relaxation)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Wraps a relaxation solver and requests a stop while solving its `at`-th relaxation.
pub struct StopAt<R> {
    inner: R,
    at: u64,
    stop: StopHandle,
    calls: AtomicU64,
}

impl<R> StopAt<R> {
    pub fn new(inner: R, at: u64, stop: StopHandle) -> Self {
        Self {
            inner,
            at,
            stop,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<R: RelaxationSolver> RelaxationSolver for StopAt<R> {
    fn solve_relaxation(
        &self,
        relaxation: &Relaxation<'_>,
    ) -> Result<RelaxationOutcome, SolverError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.at {
            self.stop.stop();
        }
        self.inner.solve_relaxation(relaxation)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Scripted LP engine: answers by the number of branching constraints on the subproblem.
pub struct Scripted {
    pub original_constraints: usize,
    pub by_depth: Vec<RelaxationOutcome>,
}

impl RelaxationSolver for Scripted {
    fn solve_relaxation(
        &self,
        relaxation: &Relaxation<'_>,
    ) -> Result<RelaxationOutcome, SolverError> {
        let depth = relaxation.num_constraints() - self.original_constraints;
        self.by_depth
            .get(depth)
            .cloned()
            .ok_or_else(|| SolverError::ExecutionFailed(format!("no script for depth {}", depth)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
