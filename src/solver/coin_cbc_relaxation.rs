// COIN-OR CBC relaxation adapter
// CBC is a MIP solver, but relaxations reach it without integer columns so it
// only runs its LP engine

use good_lp::{solvers::coin_cbc::coin_cbc, SolverModel};

use super::good_lp_model::{build_model, into_outcome, GoodLpModel};
use crate::domain::{
    relaxation::{Relaxation, RelaxationOutcome, RelaxationSolver},
    solver_service::Result,
};

#[derive(Debug, Default, Clone)]
pub struct CoinCbcRelaxation;

impl CoinCbcRelaxation {
    pub fn new() -> Self {
        Self
    }
}

impl RelaxationSolver for CoinCbcRelaxation {
    fn solve_relaxation(&self, relaxation: &Relaxation<'_>) -> Result<RelaxationOutcome> {
        let GoodLpModel {
            vars,
            columns,
            objective,
            constraints,
        } = build_model(relaxation);

        let mut lp_model = vars.maximise(objective).using(coin_cbc);
        lp_model.set_parameter("logLevel", "0");
        for constraint in constraints {
            lp_model = lp_model.with(constraint);
        }

        into_outcome(lp_model.solve(), relaxation, &columns)
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
