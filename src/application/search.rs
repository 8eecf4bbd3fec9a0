// Search state shared by the sequential and parallel engines
// SearchRun owns the frontier of one solve; evaluate classifies one relaxation outcome

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::frontier::Frontier;
use super::incumbent::{Incumbent, IncumbentSolution};
use super::subproblem::{NodeIds, NodeState, RelaxedSubproblem, SearchModel, Subproblem};
use crate::domain::{
    BranchingRule, MilpProblem, RelaxationOutcome, Result, Solution, SolutionQuality,
    SolutionStatus, SolverConfig, SolverError, SolverStatistics, VariableType,
};

/// Cooperative stop request, checked whenever a subproblem leaves the frontier.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous request so the engine can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Everything a worker needs to classify a solved subproblem.
#[derive(Debug)]
pub struct SearchContext {
    pub tolerance: f64,
    pub branching_rule: BranchingRule,
    pub pruning: bool,
    pub incumbent: Incumbent,
    pub ids: NodeIds,
}

impl SearchContext {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            branching_rule: config.branching_rule,
            pruning: config.pruning,
            incumbent: Incumbent::new(),
            ids: NodeIds::new(),
        }
    }
}

/// Result of processing one solved subproblem.
#[derive(Debug)]
pub enum NodeVerdict {
    Infeasible,
    /// Relaxation value cannot beat the incumbent
    Pruned,
    Integral { improved: bool },
    Branched(Subproblem, Subproblem),
    /// Only produced for the root
    Unbounded,
}

impl NodeVerdict {
    pub fn state(&self) -> NodeState {
        match self {
            NodeVerdict::Infeasible => NodeState::Infeasible,
            NodeVerdict::Pruned => NodeState::Pruned,
            NodeVerdict::Integral { .. } => NodeState::Integral,
            NodeVerdict::Branched(..) => NodeState::Branched,
            NodeVerdict::Unbounded => NodeState::Unbounded,
        }
    }
}

/// Classify a subproblem from its relaxation outcome, updating the incumbent.
pub fn evaluate(
    context: &SearchContext,
    node: Subproblem,
    outcome: RelaxationOutcome,
) -> Result<NodeVerdict> {
    let (objective_value, values) = match outcome {
        RelaxationOutcome::Infeasible => {
            debug!(node = node.id(), depth = node.depth(), "relaxation infeasible");
            return Ok(NodeVerdict::Infeasible);
        }
        RelaxationOutcome::Unbounded if node.is_root() => {
            return Ok(NodeVerdict::Unbounded);
        }
        RelaxationOutcome::Unbounded => {
            return Err(SolverError::RelaxationUnbounded { node_id: node.id() });
        }
        RelaxationOutcome::Optimal {
            objective_value,
            values,
        } => (objective_value, values),
    };

    let relaxed = RelaxedSubproblem::new(node, objective_value, values)?;
    let tolerance = context.tolerance;

    if context.pruning && context.incumbent.can_prune(relaxed.objective_value, tolerance) {
        debug!(
            node = relaxed.node.id(),
            parent = ?relaxed.node.parent_id(),
            value = relaxed.objective_value,
            incumbent = context.incumbent.value(),
            "pruned by bound"
        );
        return Ok(NodeVerdict::Pruned);
    }

    match relaxed.select_branching_variable(context.branching_rule, tolerance) {
        None => {
            let improved = context.incumbent.try_improve(
                IncumbentSolution {
                    value: relaxed.objective_value,
                    values: relaxed.rounded_values(),
                    node_id: relaxed.node.id(),
                },
                tolerance,
            );
            if improved {
                info!(
                    node = relaxed.node.id(),
                    depth = relaxed.node.depth(),
                    value = relaxed.node.model().to_caller_value(relaxed.objective_value),
                    "new incumbent"
                );
            }
            Ok(NodeVerdict::Integral { improved })
        }
        Some(var) => {
            let (down, up) = relaxed.branch(var, &context.ids, tolerance)?;
            debug!(
                node = relaxed.node.id(),
                depth = relaxed.node.depth(),
                value = relaxed.objective_value,
                branch_var = %var,
                branch_value = relaxed.values[var.index()],
                "branched"
            );
            Ok(NodeVerdict::Branched(down, up))
        }
    }
}

/// Frontier, budgets and statistics of one solve.
pub struct SearchRun<'p> {
    problem: &'p MilpProblem,
    model: Arc<SearchModel>,
    context: Arc<SearchContext>,
    frontier: Frontier,
    stats: SolverStatistics,
    started: Instant,
    unbounded: bool,
}

impl<'p> SearchRun<'p> {
    /// Set up the search with the root subproblem on the frontier.
    pub fn new(problem: &'p MilpProblem) -> Self {
        let config = &problem.solver_config;
        let model = Arc::new(SearchModel::from_problem(problem));
        let mut frontier = Frontier::new(config.node_selection);
        frontier.push(Subproblem::root(Arc::clone(&model)));

        let stats = SolverStatistics {
            num_variables: problem.variables.len() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: count_type(problem, VariableType::Integer),
            num_binary_vars: count_type(problem, VariableType::Binary),
            nodes_created: 1,
            ..SolverStatistics::default()
        };

        info!(
            problem = %problem.name,
            variables = stats.num_variables,
            constraints = stats.num_constraints,
            integer_vars = problem.num_integer_variables(),
            "starting branch-and-bound"
        );
        if !problem.is_mixed_integer() {
            debug!("no integer variables, the root relaxation decides the search");
        }

        Self {
            problem,
            model,
            context: Arc::new(SearchContext::new(config)),
            frontier,
            stats,
            started: Instant::now(),
            unbounded: false,
        }
    }

    pub fn context(&self) -> &Arc<SearchContext> {
        &self.context
    }

    /// Next subproblem worth solving, discarding those the incumbent already dominates.
    pub fn pop_live(&mut self) -> Option<Subproblem> {
        while let Some(node) = self.frontier.pop() {
            if self.context.pruning
                && self
                    .context
                    .incumbent
                    .can_prune(node.bound(), self.context.tolerance)
            {
                debug!(node = node.id(), bound = node.bound(), "pruned before solving");
                self.stats.nodes_pruned += 1;
                continue;
            }
            return Some(node);
        }
        None
    }

    /// Put a popped subproblem back, unsolved.
    pub fn requeue(&mut self, node: Subproblem) {
        self.frontier.push(node);
    }

    /// Budget or stop request that ends the search before `in_flight` more solves.
    pub fn budget_status(&self, stop: &StopHandle, in_flight: u64) -> Option<SolutionStatus> {
        let config = &self.problem.solver_config;
        if stop.is_stopped() {
            return Some(SolutionStatus::Interrupted);
        }
        if let Some(limit) = config.node_limit {
            if self.stats.nodes_explored + in_flight >= limit {
                return Some(SolutionStatus::NodeLimit);
            }
        }
        if let Some(limit) = config.time_limit {
            if self.started.elapsed().as_secs_f64() >= limit {
                return Some(SolutionStatus::TimeLimit);
            }
        }
        None
    }

    /// Fold one verdict into the statistics and the frontier.
    pub fn record(&mut self, depth: usize, verdict: NodeVerdict) {
        self.stats.nodes_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        match verdict {
            NodeVerdict::Infeasible => self.stats.nodes_infeasible += 1,
            NodeVerdict::Pruned => self.stats.nodes_pruned += 1,
            NodeVerdict::Integral { improved } => {
                if improved {
                    self.stats.incumbent_updates += 1;
                    if self.context.pruning {
                        let dropped = self
                            .frontier
                            .prune_by_bound(self.context.incumbent.value(), self.context.tolerance);
                        self.stats.nodes_pruned += dropped as u64;
                    }
                }
            }
            NodeVerdict::Branched(down, up) => {
                self.stats.nodes_branched += 1;
                self.stats.nodes_created += 2;
                self.frontier.push(down);
                self.frontier.push(up);
            }
            NodeVerdict::Unbounded => self.unbounded = true,
        }

        if self.problem.solver_config.verbose && self.stats.nodes_explored % 100 == 0 {
            info!(
                explored = self.stats.nodes_explored,
                open = self.frontier.len(),
                incumbent = self.model.to_caller_value(self.context.incumbent.value()),
                "search progress"
            );
        }
    }

    pub fn has_open_nodes(&self) -> bool {
        !self.frontier.is_empty()
    }

    /// The root relaxation turned out unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    /// Build the caller's solution. `stopped` is the budget status that ended the search early.
    pub fn finish(mut self, stopped: Option<SolutionStatus>) -> Solution {
        self.stats.solve_time_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let incumbent = self.context.incumbent.snapshot();
        let open_bound = self.frontier.best_bound().filter(|b| b.is_finite());

        let mut solution = if self.unbounded {
            Solution::new(
                SolutionStatus::Unbounded,
                "Root relaxation is unbounded: objective can be improved infinitely",
            )
        } else {
            match (stopped, incumbent) {
                (None, Some(best)) => {
                    let value = self.problem.objective.evaluate(&best.values);
                    let mut solution = Solution::optimal(value, best.values);
                    solution.message =
                        format!("Optimal solution found for '{}'", self.problem.name);
                    solution
                }
                (None, None) => Solution::new(
                    SolutionStatus::Infeasible,
                    "No feasible integral solution exists",
                ),
                (Some(status), best) => {
                    warn!(%status, open = self.frontier.len(), "search stopped early");
                    let mut solution = Solution::new(
                        status,
                        format!("Search stopped early ({}); returning best solution found", status),
                    );
                    if let Some(best) = best {
                        let bound = open_bound.map_or(best.value, |b| b.max(best.value));
                        solution.optimal_value =
                            Some(self.problem.objective.evaluate(&best.values));
                        solution.best_bound = Some(self.model.to_caller_value(bound));
                        solution.gap = Some((bound - best.value).abs() / best.value.abs().max(1.0));
                        solution.variable_values = best.values;
                    } else {
                        solution.best_bound = open_bound.map(|b| self.model.to_caller_value(b));
                    }
                    solution
                }
            }
        };

        if !solution.variable_values.is_empty() {
            let quality = SolutionQuality::measure(self.problem, &solution.variable_values);
            solution = solution.with_quality(quality);
        }

        info!(
            status = %solution.status,
            value = ?solution.optimal_value,
            explored = self.stats.nodes_explored,
            pruned = self.stats.nodes_pruned,
            time_ms = self.stats.solve_time_ms,
            "branch-and-bound finished"
        );

        solution.with_statistics(self.stats)
    }
}

fn count_type(problem: &MilpProblem, variable_type: VariableType) -> u32 {
    problem
        .variables
        .iter()
        .filter(|v| v.variable_type == variable_type)
        .count() as u32
}
