// Subproblems of the branch-and-bound tree
// Children share one SearchModel and extend a persistent list of branching constraints

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{
    BranchingRule, Constraint, ConstraintType, MilpProblem, OptimizationType, Relaxation, Result,
    SolverError, VarId, Variable,
};

/// Problem data shared by every subproblem of one search.
#[derive(Debug)]
pub struct SearchModel {
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    /// Objective coefficients, always maximized
    pub objective: Vec<f64>,
    pub sense: OptimizationType,
}

impl SearchModel {
    pub fn from_problem(problem: &MilpProblem) -> Self {
        let sense = problem.objective.optimization_type;
        Self {
            variables: problem.variables.clone(),
            constraints: problem.constraints.clone(),
            objective: problem
                .objective
                .coefficients
                .iter()
                .map(|c| c * sense.sign())
                .collect(),
            sense,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Convert a maximization value back to the caller's objective sense.
    pub fn to_caller_value(&self, value: f64) -> f64 {
        value * self.sense.sign()
    }
}

/// How a solved subproblem left the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Infeasible,
    Integral,
    Branched,
    Pruned,
    Unbounded,
}

/// Monotonic subproblem id source, shared by all workers of one search.
#[derive(Debug)]
pub struct NodeIds(AtomicU64);

impl NodeIds {
    /// Ids start at 1; the root is 0.
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for NodeIds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct BranchLink {
    constraint: Constraint,
    parent: Option<Arc<BranchLink>>,
}

/// One region of the search space.
#[derive(Debug, Clone)]
pub struct Subproblem {
    id: u64,
    parent_id: Option<u64>,
    depth: usize,
    /// Relaxation value of the parent; an upper bound for this subtree
    bound: f64,
    model: Arc<SearchModel>,
    branchings: Option<Arc<BranchLink>>,
}

impl Subproblem {
    pub fn root(model: Arc<SearchModel>) -> Self {
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            bound: f64::INFINITY,
            model,
            branchings: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn model(&self) -> &Arc<SearchModel> {
        &self.model
    }

    /// Branching constraints added along the path from the root, oldest first.
    pub fn branching_constraints(&self) -> Vec<&Constraint> {
        let mut path = Vec::with_capacity(self.depth);
        let mut link = self.branchings.as_deref();
        while let Some(current) = link {
            path.push(&current.constraint);
            link = current.parent.as_deref();
        }
        path.reverse();
        path
    }

    /// Original constraints followed by the branching constraints.
    pub fn constraints(&self) -> Vec<&Constraint> {
        let mut all: Vec<&Constraint> = self.model.constraints.iter().collect();
        all.extend(self.branching_constraints());
        all
    }

    pub fn num_constraints(&self) -> usize {
        self.model.constraints.len() + self.depth
    }

    /// Arguments for the LP engine. Pure; borrows from the subproblem.
    pub fn build_relaxation(&self) -> Relaxation<'_> {
        Relaxation {
            variables: &self.model.variables,
            objective: &self.model.objective,
            constraints: self.constraints(),
        }
    }

    fn child(&self, id: u64, bound: f64, constraint: Constraint) -> Subproblem {
        Subproblem {
            id,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            bound,
            model: Arc::clone(&self.model),
            branchings: Some(Arc::new(BranchLink {
                constraint,
                parent: self.branchings.clone(),
            })),
        }
    }
}

/// Distance of a value to its nearest integer.
pub fn fractionality(value: f64) -> f64 {
    (value - value.round()).abs()
}

/// A subproblem together with the optimal solution of its relaxation.
#[derive(Debug, Clone)]
pub struct RelaxedSubproblem {
    pub node: Subproblem,
    /// Relaxation value, maximization sense
    pub objective_value: f64,
    pub values: Vec<f64>,
}

impl RelaxedSubproblem {
    /// Attach a relaxation result, rejecting non-finite or mis-sized assignments.
    pub fn new(node: Subproblem, objective_value: f64, values: Vec<f64>) -> Result<Self> {
        if values.len() != node.model.num_variables() {
            return Err(SolverError::InternalInvariant(format!(
                "relaxation of subproblem {} returned {} values for {} variables",
                node.id,
                values.len(),
                node.model.num_variables()
            )));
        }
        if !objective_value.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InternalInvariant(format!(
                "relaxation of subproblem {} returned non-finite numbers",
                node.id
            )));
        }
        Ok(Self {
            node,
            objective_value,
            values,
        })
    }

    /// Integer variables whose value is farther than `tolerance` from an integer.
    pub fn fractional_variables(
        &self,
        tolerance: f64,
    ) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.node
            .model
            .variables
            .iter()
            .zip(&self.values)
            .enumerate()
            .filter(move |(_, (var, value))| {
                var.is_integer() && fractionality(**value) > tolerance
            })
            .map(|(i, (_, &value))| (VarId(i), value))
    }

    pub fn is_integral(&self, tolerance: f64) -> bool {
        self.fractional_variables(tolerance).next().is_none()
    }

    /// Pick the variable to branch on, `None` when the assignment is integral.
    pub fn select_branching_variable(
        &self,
        rule: BranchingRule,
        tolerance: f64,
    ) -> Option<VarId> {
        match rule {
            BranchingRule::FirstFractional => {
                self.fractional_variables(tolerance).next().map(|(var, _)| var)
            }
            BranchingRule::MostFractional => {
                let mut best: Option<(VarId, f64)> = None;
                for (var, value) in self.fractional_variables(tolerance) {
                    let score = fractionality(value);
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((var, score));
                    }
                }
                best.map(|(var, _)| var)
            }
        }
    }

    /// Integer assignment with integer variables snapped to their nearest integer.
    pub fn rounded_values(&self) -> Vec<f64> {
        self.node
            .model
            .variables
            .iter()
            .zip(&self.values)
            .map(|(var, &value)| if var.is_integer() { value.round() } else { value })
            .collect()
    }

    /// Split on `var`: `(x <= floor(v), x >= ceil(v))`.
    ///
    /// Both children inherit this subproblem's relaxation value as their bound.
    pub fn branch(
        &self,
        var: VarId,
        ids: &NodeIds,
        tolerance: f64,
    ) -> Result<(Subproblem, Subproblem)> {
        let value = *self.values.get(var.index()).ok_or_else(|| {
            SolverError::InternalInvariant(format!("branching variable {} does not exist", var))
        })?;
        if fractionality(value) <= tolerance {
            return Err(SolverError::InternalInvariant(format!(
                "branching on {} = {} which is already integral",
                var, value
            )));
        }

        let num_vars = self.node.model.num_variables();
        let floor = Constraint::on_variable(
            var,
            num_vars,
            ConstraintType::LessThanOrEqual,
            value.floor(),
        );
        let ceil = Constraint::on_variable(
            var,
            num_vars,
            ConstraintType::GreaterThanOrEqual,
            value.ceil(),
        );

        Ok((
            self.node.child(ids.next(), self.objective_value, floor),
            self.node.child(ids.next(), self.objective_value, ceil),
        ))
    }
}
