// HiGHS relaxation adapter
// Talks to HiGHS directly through its RowProblem API

use highs::{HighsModelStatus, RowProblem, Sense, SolvedModel};
use tracing::debug;

use crate::domain::{
    relaxation::{Relaxation, RelaxationOutcome, RelaxationSolver},
    solver_service::{Result, SolverError},
    value_objects::ConstraintType,
};

#[derive(Debug, Default, Clone)]
pub struct HighsRelaxation;

impl HighsRelaxation {
    pub fn new() -> Self {
        Self
    }

    fn build_problem(relaxation: &Relaxation<'_>) -> RowProblem {
        // Add columns first, then rows; every column is continuous
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(relaxation.num_variables());

        for (var_def, &obj_coeff) in relaxation.variables.iter().zip(relaxation.objective) {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            cols.push(pb.add_column(obj_coeff, lower..upper));
        }

        for constraint in &relaxation.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|(coeff, _)| **coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        pb
    }

    fn run(relaxation: &Relaxation<'_>, presolve: bool) -> SolvedModel {
        let mut model = Self::build_problem(relaxation).optimise(Sense::Maximise);
        model.set_option("output_flag", false);
        if !presolve {
            model.set_option("presolve", "off");
        }
        model.solve()
    }
}

impl RelaxationSolver for HighsRelaxation {
    fn solve_relaxation(&self, relaxation: &Relaxation<'_>) -> Result<RelaxationOutcome> {
        let mut solved = Self::run(relaxation, true);

        // Presolve may stop at "unbounded or infeasible"; the simplex run without it decides
        if matches!(solved.status(), HighsModelStatus::UnboundedOrInfeasible) {
            debug!(
                constraints = relaxation.num_constraints(),
                "HiGHS presolve was inconclusive, solving again without presolve"
            );
            solved = Self::run(relaxation, false);
        }

        match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective_value = relaxation.evaluate(&values);
                Ok(RelaxationOutcome::Optimal {
                    objective_value,
                    values,
                })
            }
            HighsModelStatus::Infeasible => Ok(RelaxationOutcome::Infeasible),
            HighsModelStatus::Unbounded => Ok(RelaxationOutcome::Unbounded),
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
