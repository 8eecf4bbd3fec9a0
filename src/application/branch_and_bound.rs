// Sequential best-first branch-and-bound
// Single Responsibility: drive the search loop; LP solving is delegated to a RelaxationSolver

use tracing::debug;

use super::search::{evaluate, SearchRun, StopHandle};
use crate::domain::{
    models::{MilpProblem, Solution},
    relaxation::RelaxationSolver,
    solver_service::{Result, SolverService},
};

/// Branch-and-bound engine solving one relaxation at a time.
pub struct BranchAndBound<R> {
    relaxation: R,
    stop: StopHandle,
    name: String,
}

impl<R: RelaxationSolver> BranchAndBound<R> {
    pub fn new(relaxation: R) -> Self {
        let name = format!("branch-and-bound ({})", relaxation.name());
        Self {
            relaxation,
            stop: StopHandle::new(),
            name,
        }
    }

    /// Share an existing stop handle, e.g. one wired to a signal handler.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that stops a running `solve` at the next frontier pop.
    ///
    /// A stop request stays set: every later `solve` on this engine returns
    /// `Interrupted` before solving anything until [`StopHandle::reset`] is called.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn relaxation(&self) -> &R {
        &self.relaxation
    }
}

impl<R: RelaxationSolver> SolverService for BranchAndBound<R> {
    fn solve(&self, problem: &MilpProblem) -> Result<Solution> {
        // Validate first
        self.validate(problem)?;

        let mut run = SearchRun::new(problem);

        let stopped = loop {
            let Some(node) = run.pop_live() else {
                break None;
            };
            if let Some(status) = run.budget_status(&self.stop, 0) {
                run.requeue(node);
                break Some(status);
            }

            let depth = node.depth();
            let outcome = self.relaxation.solve_relaxation(&node.build_relaxation())?;
            let verdict = evaluate(run.context(), node, outcome)?;
            debug!(depth, state = ?verdict.state(), "subproblem resolved");
            run.record(depth, verdict);

            if run.is_unbounded() {
                break None;
            }
        };

        Ok(run.finish(stopped))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
