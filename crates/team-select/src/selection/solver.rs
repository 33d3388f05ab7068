use std::collections::BTreeMap;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{Comparator, RowId, SelectionMode};
use super::error::{SolveFailure, SolverStatus};
use super::model::OptimizationModel;

/// Raw answer of a solving engine: a status and, when optimal, one value per
/// model variable in variable order.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub status: SolverStatus,
    pub values: Vec<f64>,
    pub message: Option<String>,
}

impl EngineOutput {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolverStatus::Optimal,
            values,
            message: None,
        }
    }

    pub fn failed(status: SolverStatus, message: Option<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            message,
        }
    }
}

/// Backend able to maximize an [`OptimizationModel`]. Implementations make a
/// single attempt and never relax the model.
pub trait SolverEngine {
    fn run(&self, model: &OptimizationModel) -> EngineOutput;
}

/// Solved value of every selection variable, keyed by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    values: BTreeMap<RowId, f64>,
    objective_value: f64,
}

impl Assignment {
    pub fn value(&self, row: RowId) -> Option<f64> {
        self.values.get(&row).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, f64)> + '_ {
        self.values.iter().map(|(row, value)| (*row, *value))
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Runs `engine` once and keeps its answer only when it is optimal.
pub fn solve<E>(model: &OptimizationModel, engine: &E) -> Result<Assignment, SolveFailure>
where
    E: SolverEngine + ?Sized,
{
    let output = engine.run(model);

    if output.status != SolverStatus::Optimal {
        warn!(status = %output.status, message = ?output.message, "solver found no optimal selection");
        return Err(match output.message {
            Some(message) => SolveFailure::with_detail(output.status, message),
            None => SolveFailure::new(output.status),
        });
    }

    if output.values.len() != model.variables().len() {
        return Err(SolveFailure::with_detail(
            SolverStatus::NotSolved,
            format!(
                "engine returned {} values for {} variables",
                output.values.len(),
                model.variables().len()
            ),
        ));
    }
    if output.values.iter().any(|value| !value.is_finite()) {
        return Err(SolveFailure::with_detail(
            SolverStatus::NotSolved,
            "engine returned a non-finite value",
        ));
    }

    let objective_value = model.objective_value(&output.values);
    debug!(objective_value, "solver returned optimal assignment");

    Ok(Assignment {
        values: model
            .variables()
            .iter()
            .copied()
            .zip(output.values)
            .collect(),
        objective_value,
    })
}

/// `good_lp` backed engine using the pure Rust `microlp` solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpEngine;

impl SolverEngine for GoodLpEngine {
    fn run(&self, model: &OptimizationModel) -> EngineOutput {
        let mut problem = ProblemVariables::new();
        let variables: Vec<Variable> = model
            .variables()
            .iter()
            .map(|_| {
                let definition = match model.mode() {
                    SelectionMode::Binary => variable().binary(),
                    SelectionMode::Fractional => variable().min(0.0).max(1.0),
                };
                problem.add(definition)
            })
            .collect();

        let objective = linear_expression(model.objective(), &variables);
        let mut solver_model = problem.maximise(objective).using(microlp);

        for row in model.constraints() {
            let lhs = linear_expression(&row.coefficients, &variables);
            let linear = match row.comparator {
                Comparator::AtMost => constraint::leq(lhs, row.rhs),
                Comparator::AtLeast => constraint::geq(lhs, row.rhs),
                Comparator::Equal => constraint::eq(lhs, row.rhs),
            };
            solver_model = solver_model.with(linear);
        }

        match solver_model.solve() {
            Ok(solution) => EngineOutput::optimal(
                variables
                    .iter()
                    .map(|variable| solution.value(*variable))
                    .collect(),
            ),
            Err(ResolutionError::Infeasible) => {
                EngineOutput::failed(SolverStatus::Infeasible, None)
            }
            Err(ResolutionError::Unbounded) => {
                EngineOutput::failed(SolverStatus::Unbounded, None)
            }
            Err(other) => EngineOutput::failed(SolverStatus::NotSolved, Some(other.to_string())),
        }
    }
}

fn linear_expression(coefficients: &[f64], variables: &[Variable]) -> Expression {
    let mut expression = Expression::from(0.0);
    for (coefficient, variable) in coefficients.iter().zip(variables) {
        expression += *variable * *coefficient;
    }
    expression
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine(EngineOutput);

    impl SolverEngine for FixedEngine {
        fn run(&self, _model: &OptimizationModel) -> EngineOutput {
            self.0.clone()
        }
    }

    fn model() -> OptimizationModel {
        crate::selection::tests::common::scenario_model(SelectionMode::Binary)
    }

    #[test]
    fn optimal_output_is_keyed_by_row() {
        let model = model();
        let engine = FixedEngine(EngineOutput::optimal(vec![1.0, 1.0, 0.0]));

        let assignment = solve(&model, &engine).expect("optimal");

        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.value(RowId(1)), Some(1.0));
        assert_eq!(assignment.value(RowId(2)), Some(0.0));
        assert_eq!(assignment.objective_value(), 7.0);
    }

    #[test]
    fn non_optimal_status_is_surfaced() {
        let model = model();
        for status in [
            SolverStatus::Infeasible,
            SolverStatus::Unbounded,
            SolverStatus::NotSolved,
        ] {
            let engine = FixedEngine(EngineOutput::failed(status, None));
            let failure = solve(&model, &engine).expect_err("not optimal");
            assert_eq!(failure.status, status);
            assert!(failure.to_string().contains(status.label()));
        }
    }

    #[test]
    fn engine_message_becomes_failure_detail() {
        let engine = FixedEngine(EngineOutput::failed(
            SolverStatus::NotSolved,
            Some("iteration limit".to_string()),
        ));

        let failure = solve(&model(), &engine).expect_err("not optimal");
        assert_eq!(failure.detail.as_deref(), Some("iteration limit"));
        assert!(failure.to_string().ends_with("(iteration limit)"));
    }

    #[test]
    fn short_value_vector_is_not_trusted() {
        let model = model();
        let engine = FixedEngine(EngineOutput::optimal(vec![1.0]));

        let failure = solve(&model, &engine).expect_err("value count mismatch");
        assert_eq!(failure.status, SolverStatus::NotSolved);
    }

    #[test]
    fn good_lp_engine_solves_scenario() {
        let model = model();
        let assignment = solve(&model, &GoodLpEngine).expect("optimal");

        assert!((assignment.value(RowId(0)).expect("A solved") - 1.0).abs() < 1e-6);
        assert!((assignment.value(RowId(1)).expect("B solved") - 1.0).abs() < 1e-6);
        assert!(assignment.value(RowId(2)).expect("C solved").abs() < 1e-6);
    }

    #[test]
    fn good_lp_engine_reports_infeasible_model() {
        let model = crate::selection::tests::common::model_with_constraint(
            "fouls>=10",
            SelectionMode::Binary,
        );
        let failure = solve(&model, &GoodLpEngine).expect_err("infeasible");
        assert_eq!(failure.status, SolverStatus::Infeasible);
    }
}
