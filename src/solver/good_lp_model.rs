// Translation between relaxations and good_lp models
// Shared by every adapter that reaches its LP engine through good_lp

use good_lp::{
    variable, variables, Constraint as LpConstraint, Expression, ProblemVariables,
    ResolutionError, Solution as GoodLpSolutionTrait, Variable as LpVariable,
};

use crate::domain::{
    relaxation::{Relaxation, RelaxationOutcome},
    solver_service::{Result, SolverError},
    value_objects::ConstraintType,
};

/// A relaxation expressed with good_lp types, ready for `maximise(..).using(..)`.
pub(crate) struct GoodLpModel {
    pub vars: ProblemVariables,
    pub columns: Vec<LpVariable>,
    pub objective: Expression,
    pub constraints: Vec<LpConstraint>,
}

pub(crate) fn build_model(relaxation: &Relaxation<'_>) -> GoodLpModel {
    // Build variables; integrality is dropped on purpose
    let mut vars = variables!();
    let mut columns = Vec::with_capacity(relaxation.num_variables());
    for var_def in relaxation.variables {
        let mut definition = variable().min(var_def.lower_bound);
        if let Some(upper) = var_def.upper_bound {
            definition = definition.max(upper);
        }
        columns.push(vars.add(definition));
    }

    // Build objective expression
    let mut objective: Expression = 0.into();
    for (&coeff, &column) in relaxation.objective.iter().zip(&columns) {
        if coeff != 0.0 {
            objective += coeff * column;
        }
    }

    // Build constraints
    let constraints = relaxation
        .constraints
        .iter()
        .map(|constraint| {
            let mut lhs: Expression = 0.into();
            for (&coeff, &column) in constraint.coefficients.iter().zip(&columns) {
                if coeff != 0.0 {
                    lhs += coeff * column;
                }
            }
            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lhs.leq(constraint.bound),
                ConstraintType::Equal => lhs.eq(constraint.bound),
                ConstraintType::GreaterThanOrEqual => lhs.geq(constraint.bound),
            }
        })
        .collect();

    GoodLpModel {
        vars,
        columns,
        objective,
        constraints,
    }
}

/// Map a good_lp resolution onto a relaxation outcome.
pub(crate) fn into_outcome<S: GoodLpSolutionTrait>(
    result: std::result::Result<S, ResolutionError>,
    relaxation: &Relaxation<'_>,
    columns: &[LpVariable],
) -> Result<RelaxationOutcome> {
    match result {
        Ok(solution) => {
            let values: Vec<f64> = columns.iter().map(|&column| solution.value(column)).collect();

            // Calculate actual objective value
            let objective_value = relaxation.evaluate(&values);

            Ok(RelaxationOutcome::Optimal {
                objective_value,
                values,
            })
        }
        Err(ResolutionError::Infeasible) => Ok(RelaxationOutcome::Infeasible),
        Err(ResolutionError::Unbounded) => Ok(RelaxationOutcome::Unbounded),
        Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
    }
}
