mod common;

use std::sync::Arc;

use common::{
    assert_integral_and_feasible, knapsack, two_variable_problem, Counting, Scripted, StopAt,
};
use letsmip::{
    BranchAndBound, Constraint, MicroLpRelaxation, MilpProblem, ObjectiveFunction,
    ParallelBranchAndBound, RelaxationOutcome, SolutionStatus, SolverConfig, SolverError,
    SolverService, StopHandle, Variable,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_matches_sequential() {
    let sequential = BranchAndBound::new(MicroLpRelaxation::new())
        .solve(&knapsack())
        .unwrap();

    for threads in [1, 2, 4] {
        let problem = knapsack().with_config(SolverConfig::default().with_threads(threads));
        let parallel = ParallelBranchAndBound::new(MicroLpRelaxation::new())
            .solve_async(&problem)
            .await
            .unwrap();

        assert!(parallel.is_optimal());
        assert_eq!(parallel.optimal_value, sequential.optimal_value, "threads = {}", threads);
        assert_integral_and_feasible(&problem, &parallel);
    }
}

#[tokio::test]
async fn test_parallel_solves_each_subproblem_once() {
    let counting = Arc::new(Counting::new(MicroLpRelaxation::new()));
    let engine = ParallelBranchAndBound::from_arc(Arc::clone(&counting));

    let solution = engine.solve_async(&knapsack()).await.unwrap();
    assert_eq!(counting.calls(), solution.statistics.nodes_explored);
}

#[tokio::test]
async fn test_parallel_node_limit_counts_in_flight_solves() {
    let problem = knapsack().with_config(
        SolverConfig::default()
            .with_threads(4)
            .with_node_limit(3),
    );
    let solution = ParallelBranchAndBound::new(MicroLpRelaxation::new())
        .solve_async(&problem)
        .await
        .unwrap();

    assert_eq!(solution.status, SolutionStatus::NodeLimit);
    assert!(solution.statistics.nodes_explored <= 3);
}

#[tokio::test]
async fn test_parallel_stop_request() {
    let engine = ParallelBranchAndBound::new(MicroLpRelaxation::new());
    engine.stop_handle().stop();

    let solution = engine.solve_async(&two_variable_problem()).await.unwrap();
    assert_eq!(solution.status, SolutionStatus::Interrupted);
    assert_eq!(solution.statistics.nodes_explored, 0);
}

#[tokio::test]
async fn test_stop_during_batch_discards_in_flight_results() {
    // Batches: root, then {x0 <= 0, x0 >= 1}, then the two x0 >= 1 children.
    // The stop arrives while the third batch is solving.
    let stop = StopHandle::new();
    let relaxation = Arc::new(StopAt::new(MicroLpRelaxation::new(), 4, stop.clone()));
    let engine = ParallelBranchAndBound::from_arc(Arc::clone(&relaxation)).with_stop_handle(stop);
    let problem = knapsack().with_config(SolverConfig::default().with_threads(4));

    let solution = engine.solve_async(&problem).await.unwrap();
    assert_eq!(solution.status, SolutionStatus::Interrupted);
    assert_eq!(relaxation.calls(), 5);
    assert_eq!(solution.statistics.nodes_explored, 3);
    assert!(solution.statistics.nodes_explored < relaxation.calls());

    // Incumbent found in the second batch is returned
    assert_eq!(solution.optimal_value, Some(390.0));
    assert_integral_and_feasible(&problem, &solution);
    assert!(solution.best_bound.unwrap() > 390.0);
}

#[tokio::test]
async fn test_node_limit_does_not_mask_a_finished_search() {
    // Maximize y s.t. y <= 1; x has no objective weight. The root reports x
    // fractional, both children tie the root bound, so the first child's
    // integral point prunes the one held back by the node limit.
    let problem = MilpProblem::new(ObjectiveFunction::maximize(vec![0.0, 1.0]))
        .with_variables(vec![Variable::integer("x"), Variable::continuous("y")])
        .add_constraint(Constraint::less_equal(vec![0.0, 1.0], 1.0))
        .with_config(SolverConfig::default().with_threads(2).with_node_limit(2));
    let scripted = Scripted {
        original_constraints: 1,
        by_depth: vec![
            RelaxationOutcome::Optimal {
                objective_value: 1.0,
                values: vec![0.5, 1.0],
            },
            RelaxationOutcome::Optimal {
                objective_value: 1.0,
                values: vec![0.0, 1.0],
            },
        ],
    };

    let solution = ParallelBranchAndBound::new(scripted)
        .solve_async(&problem)
        .await
        .unwrap();
    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert_eq!(solution.optimal_value, Some(1.0));
    assert_eq!(solution.statistics.nodes_explored, 2);
    assert_eq!(solution.statistics.nodes_pruned, 1);
}

#[tokio::test]
async fn test_blocking_solve_inside_runtime_is_rejected() {
    let engine = ParallelBranchAndBound::new(MicroLpRelaxation::new());
    assert!(matches!(
        engine.solve(&two_variable_problem()),
        Err(SolverError::ExecutionFailed(_))
    ));
}

#[test]
fn test_blocking_solve_builds_its_own_runtime() {
    let engine = ParallelBranchAndBound::new(MicroLpRelaxation::new());
    let solution = engine.solve(&two_variable_problem()).unwrap();
    assert_eq!(solution.optimal_value, Some(3.0));
    assert_eq!(engine.name(), "parallel branch-and-bound (microlp)");
}

#[test]
fn test_zero_threads_is_invalid() {
    let problem = knapsack().with_config(SolverConfig::default().with_threads(0));
    let engine = ParallelBranchAndBound::new(MicroLpRelaxation::new());
    assert!(matches!(
        engine.solve(&problem),
        Err(SolverError::InvalidProblem(_))
    ));
}
