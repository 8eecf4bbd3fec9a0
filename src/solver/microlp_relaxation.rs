// microlp relaxation adapter
// Pure-Rust dense simplex from good_lp; needs no system libraries

use good_lp::{solvers::microlp::microlp, SolverModel};

use super::good_lp_model::{build_model, into_outcome, GoodLpModel};
use crate::domain::{
    relaxation::{Relaxation, RelaxationOutcome, RelaxationSolver},
    solver_service::Result,
};

#[derive(Debug, Default, Clone)]
pub struct MicroLpRelaxation;

impl MicroLpRelaxation {
    pub fn new() -> Self {
        Self
    }
}

impl RelaxationSolver for MicroLpRelaxation {
    fn solve_relaxation(&self, relaxation: &Relaxation<'_>) -> Result<RelaxationOutcome> {
        let GoodLpModel {
            vars,
            columns,
            objective,
            constraints,
        } = build_model(relaxation);

        let mut lp_model = vars.maximise(objective).using(microlp);
        for constraint in constraints {
            lp_model = lp_model.with(constraint);
        }

        into_outcome(lp_model.solve(), relaxation, &columns)
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
