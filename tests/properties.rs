// Property-based tests for the branch-and-bound search
//
// Random small integer programs with bounded variables are checked against
// brute-force enumeration of every lattice point in the bounding box.

use std::sync::Arc;

use letsmip::application::subproblem::{NodeIds, RelaxedSubproblem, SearchModel, Subproblem};
use letsmip::{
    BranchAndBound, Constraint, ConstraintType, MicroLpRelaxation, MilpProblem, NodeSelection,
    ObjectiveFunction, RelaxationOutcome, RelaxationSolver, SolutionStatus, SolverConfig,
    SolverService, VarId, Variable,
};
use proptest::prelude::*;

const UPPER: i64 = 4;

fn small_problem() -> impl Strategy<Value = MilpProblem> {
    (1usize..=3).prop_flat_map(|n| {
        let objective = prop::collection::vec(-3i32..=6, n);
        let rows = prop::collection::vec(
            (
                prop::collection::vec(-2i32..=5, n),
                prop::bool::weighted(0.8),
                0i32..=14,
            ),
            1..=3,
        );
        (objective, rows).prop_map(move |(objective, rows)| {
            let variables = (0..n)
                .map(|i| Variable::integer(format!("x{}", i)).with_bounds(0.0, Some(UPPER as f64)))
                .collect();
            let mut problem = MilpProblem::new(ObjectiveFunction::maximize(
                objective.iter().map(|&c| c as f64).collect(),
            ))
            .with_variables(variables);
            for (coefficients, less_equal, rhs) in rows {
                let coefficients: Vec<f64> = coefficients.iter().map(|&c| c as f64).collect();
                let rhs = if less_equal { rhs as f64 } else { (rhs / 2) as f64 };
                problem = problem.add_constraint(if less_equal {
                    Constraint::less_equal(coefficients, rhs)
                } else {
                    Constraint::greater_equal(coefficients, rhs)
                });
            }
            problem
        })
    })
}

/// Best objective over every integer point of the box, `None` if none is feasible.
fn brute_force(problem: &MilpProblem) -> Option<f64> {
    let n = problem.variables.len();
    let mut point = vec![0i64; n];
    let mut best: Option<f64> = None;
    loop {
        let values: Vec<f64> = point.iter().map(|&v| v as f64).collect();
        if problem.constraints.iter().all(|c| c.violation(&values) == 0.0) {
            let value = problem.objective.evaluate(&values);
            best = Some(best.map_or(value, |b: f64| b.max(value)));
        }

        // Next point in the box
        let mut i = 0;
        while i < n && point[i] == UPPER {
            point[i] = 0;
            i += 1;
        }
        if i == n {
            return best;
        }
        point[i] += 1;
    }
}

fn solve(problem: &MilpProblem) -> letsmip::Solution {
    BranchAndBound::new(MicroLpRelaxation::new())
        .solve(problem)
        .unwrap()
}

fn relax(node: Subproblem) -> Option<RelaxedSubproblem> {
    match MicroLpRelaxation::new()
        .solve_relaxation(&node.build_relaxation())
        .unwrap()
    {
        RelaxationOutcome::Optimal {
            objective_value,
            values,
        } => Some(RelaxedSubproblem::new(node, objective_value, values).unwrap()),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn optimum_matches_enumeration(problem in small_problem()) {
        let solution = solve(&problem);
        match brute_force(&problem) {
            Some(best) => {
                prop_assert_eq!(solution.status, SolutionStatus::Optimal);
                let value = solution.optimal_value.unwrap();
                prop_assert!(
                    (value - best).abs() < 1e-6,
                    "engine {} vs enumeration {}",
                    value,
                    best
                );
                for constraint in &problem.constraints {
                    prop_assert!(constraint.violation(&solution.variable_values) < 1e-3);
                }
            }
            None => prop_assert_eq!(solution.status, SolutionStatus::Infeasible),
        }
    }

    #[test]
    fn pruning_and_frontier_order_keep_the_optimum(problem in small_problem()) {
        let pruned = solve(&problem);
        let exhaustive =
            solve(&problem.clone().with_config(SolverConfig::default().with_pruning(false)));
        let depth_first = solve(
            &problem
                .clone()
                .with_config(
                    SolverConfig::default().with_node_selection(NodeSelection::DepthFirst),
                ),
        );

        prop_assert_eq!(pruned.status, exhaustive.status);
        prop_assert_eq!(pruned.status, depth_first.status);
        prop_assert_eq!(pruned.optimal_value, exhaustive.optimal_value);
        prop_assert_eq!(pruned.optimal_value, depth_first.optimal_value);
        prop_assert!(pruned.statistics.nodes_explored <= exhaustive.statistics.nodes_explored);
    }

    #[test]
    fn search_terminates_within_node_limit(problem in small_problem()) {
        let solution = solve(&problem.with_config(SolverConfig::default().with_node_limit(5_000)));
        prop_assert!(matches!(
            solution.status,
            SolutionStatus::Optimal | SolutionStatus::Infeasible
        ));
        prop_assert!(solution.statistics.nodes_explored < 5_000);
    }

    #[test]
    fn child_bound_never_exceeds_parent(problem in small_problem()) {
        let model = Arc::new(SearchModel::from_problem(&problem));
        let ids = NodeIds::new();
        let Some(root) = relax(Subproblem::root(model)) else {
            return Ok(());
        };

        let mut open = vec![root];
        let mut checked = 0;
        while let Some(parent) = open.pop() {
            if checked > 40 {
                break;
            }
            let Some((var, _)) = parent.fractional_variables(1e-4).next() else {
                continue;
            };
            let (down, up) = parent.branch(var, &ids, 1e-4).unwrap();
            for child in [down, up] {
                prop_assert!(child.num_constraints() == parent.node.num_constraints() + 1);
                if let Some(child) = relax(child) {
                    prop_assert!(
                        child.objective_value <= parent.objective_value + 1e-7,
                        "child {} > parent {}",
                        child.objective_value,
                        parent.objective_value
                    );
                    checked += 1;
                    open.push(child);
                }
            }
        }
    }

    #[test]
    fn branching_splits_the_integers_exactly(value in -50.0f64..50.0) {
        prop_assume!((value - value.round()).abs() > 1e-3);

        let problem = MilpProblem::new(ObjectiveFunction::maximize(vec![1.0]))
            .with_variables(vec![Variable::integer("x").with_bounds(-100.0, Some(100.0))]);
        let root = Subproblem::root(Arc::new(SearchModel::from_problem(&problem)));
        let relaxed = RelaxedSubproblem::new(root, value, vec![value]).unwrap();
        let (down, up) = relaxed.branch(VarId(0), &NodeIds::new(), 1e-4).unwrap();

        let down_row = down.branching_constraints()[0].clone();
        let up_row = up.branching_constraints()[0].clone();
        prop_assert_eq!(down_row.constraint_type, ConstraintType::LessThanOrEqual);
        prop_assert_eq!(up_row.constraint_type, ConstraintType::GreaterThanOrEqual);

        for k in (value.floor() as i64 - 5)..=(value.ceil() as i64 + 5) {
            let point = [k as f64];
            let in_down = down_row.violation(&point) == 0.0;
            let in_up = up_row.violation(&point) == 0.0;
            prop_assert!(in_down != in_up, "integer {} in both or neither child", k);
        }
    }
}
