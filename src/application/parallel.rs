// Parallel branch-and-bound on a tokio blocking pool
// The coordinator owns the frontier; workers solve and classify subproblems and
// share only the incumbent.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::search::{evaluate, SearchRun, StopHandle};
use super::subproblem::Subproblem;
use crate::domain::{
    models::{MilpProblem, Solution},
    relaxation::RelaxationSolver,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolutionStatus,
};

/// Branch-and-bound engine solving up to `SolverConfig::threads` relaxations at once.
pub struct ParallelBranchAndBound<R> {
    relaxation: Arc<R>,
    stop: StopHandle,
    name: String,
}

impl<R: RelaxationSolver + 'static> ParallelBranchAndBound<R> {
    pub fn new(relaxation: R) -> Self {
        Self::from_arc(Arc::new(relaxation))
    }

    pub fn from_arc(relaxation: Arc<R>) -> Self {
        let name = format!("parallel branch-and-bound ({})", relaxation.name());
        Self {
            relaxation,
            stop: StopHandle::new(),
            name,
        }
    }

    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Stops the search after the batch in flight; its results are discarded.
    ///
    /// The request stays set across solves until [`StopHandle::reset`].
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Solve inside an existing tokio runtime.
    pub async fn solve_async(&self, problem: &MilpProblem) -> Result<Solution> {
        self.validate(problem)?;

        let threads = problem.solver_config.threads;
        let mut run = SearchRun::new(problem);

        let stopped = 'search: loop {
            // Fill one batch from the frontier
            let mut batch: Vec<Subproblem> = Vec::with_capacity(threads);
            let mut stop_after = None;
            while batch.len() < threads {
                let Some(node) = run.pop_live() else {
                    break;
                };
                if let Some(status) = run.budget_status(&self.stop, batch.len() as u64) {
                    run.requeue(node);
                    stop_after = Some(status);
                    break;
                }
                batch.push(node);
            }

            if batch.is_empty() {
                break 'search stop_after;
            }

            debug!(batch = batch.len(), "dispatching relaxations");
            let handles = batch.into_iter().map(|node| {
                let relaxation = Arc::clone(&self.relaxation);
                let context = Arc::clone(run.context());
                tokio::task::spawn_blocking(move || {
                    let outcome = relaxation.solve_relaxation(&node.build_relaxation());
                    let verdict = outcome.and_then(|o| evaluate(&context, node.clone(), o));
                    (node, verdict)
                })
            });
            let results = join_all(handles).await;

            // Results that finish after a stop request are discarded
            if self.stop.is_stopped() {
                warn!("stop requested, discarding in-flight results");
                for (node, _) in results.into_iter().flatten() {
                    run.requeue(node);
                }
                break 'search Some(SolutionStatus::Interrupted);
            }

            for joined in results {
                let (node, verdict) = joined.map_err(|e| {
                    SolverError::ExecutionFailed(format!("relaxation worker failed: {}", e))
                })?;
                run.record(node.depth(), verdict?);
            }

            if run.is_unbounded() {
                break 'search None;
            }
            // An improvement in this batch may have pruned everything left
            if stop_after.is_some() {
                break 'search stop_after.filter(|_| run.has_open_nodes());
            }
        };

        Ok(run.finish(stopped))
    }
}

impl<R: RelaxationSolver + 'static> SolverService for ParallelBranchAndBound<R> {
    /// Blocking entry point; builds its own runtime.
    ///
    /// Inside a tokio runtime use [`ParallelBranchAndBound::solve_async`] instead.
    fn solve(&self, problem: &MilpProblem) -> Result<Solution> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(SolverError::ExecutionFailed(
                "blocking solve called inside a tokio runtime; use solve_async".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(problem.solver_config.threads.max(1))
            .build()
            .map_err(|e| SolverError::ExecutionFailed(format!("failed to start runtime: {}", e)))?;

        runtime.block_on(self.solve_async(problem))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
