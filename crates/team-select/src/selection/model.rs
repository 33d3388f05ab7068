use serde::Serialize;
use tracing::debug;

use super::domain::{
    CandidateRow, Comparator, Constraint, Objective, RosterSize, RowId, SelectionMode,
};
use super::error::ModelError;

/// Label of the synthetic constraint pinning the roster size.
pub const TEAM_SIZE_LABEL: &str = "team_size";

/// Linear row over the model's variables. `coefficients[i]` multiplies
/// variable `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub label: String,
    pub coefficients: Vec<f64>,
    pub comparator: Comparator,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn activity(&self, values: &[f64]) -> f64 {
        dot(&self.coefficients, values)
    }
}

/// Maximization problem over one selection variable per eligible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationModel {
    mode: SelectionMode,
    roster: RosterSize,
    variables: Vec<RowId>,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl OptimizationModel {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn roster(&self) -> RosterSize {
        self.roster
    }

    /// Row behind each variable, in variable order.
    pub fn variables(&self) -> &[RowId] {
        &self.variables
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        dot(&self.objective, values)
    }
}

/// Translates parsed criteria and constraints into an [`OptimizationModel`].
///
/// Every row must already carry a value for each referenced metric; structural
/// infeasibility is reported here so the solver is never invoked on it.
pub fn build_model(
    rows: &[CandidateRow],
    objective: &Objective,
    constraints: &[Constraint],
    roster: RosterSize,
    mode: SelectionMode,
) -> Result<OptimizationModel, ModelError> {
    if let RosterSize::Fixed(team_size) = roster {
        if team_size == 0 {
            return Err(ModelError::EmptyTeam);
        }
        if team_size > rows.len() {
            return Err(ModelError::TeamSizeExceedsRows {
                team_size,
                eligible: rows.len(),
            });
        }
    }
    if rows.is_empty() {
        return Err(ModelError::NoEligibleRows);
    }

    let objective_coefficients = rows
        .iter()
        .map(|row| {
            objective
                .iter()
                .try_fold(0.0, |total, (metric, weight)| -> Result<f64, ModelError> {
                    Ok(total + weight * required_value(row, metric)?)
                })
        })
        .collect::<Result<Vec<f64>, ModelError>>()?;

    let mut linear_constraints = Vec::with_capacity(constraints.len() + 1);
    for (ordinal, constraint) in constraints.iter().enumerate() {
        let coefficients = rows
            .iter()
            .map(|row| required_value(row, &constraint.metric))
            .collect::<Result<Vec<f64>, ModelError>>()?;

        linear_constraints.push(LinearConstraint {
            label: format!(
                "{}_{}_{}",
                constraint.metric,
                constraint.comparator.label(),
                ordinal
            ),
            coefficients,
            comparator: constraint.comparator,
            rhs: constraint.threshold,
        });
    }

    if let RosterSize::Fixed(team_size) = roster {
        linear_constraints.push(LinearConstraint {
            label: TEAM_SIZE_LABEL.to_string(),
            coefficients: vec![1.0; rows.len()],
            comparator: Comparator::Equal,
            rhs: team_size as f64,
        });
    }

    debug!(
        variables = rows.len(),
        constraints = linear_constraints.len(),
        mode = mode.label(),
        "optimization model built"
    );

    Ok(OptimizationModel {
        mode,
        roster,
        variables: rows.iter().map(|row| row.id).collect(),
        objective: objective_coefficients,
        constraints: linear_constraints,
    })
}

fn required_value(row: &CandidateRow, metric: &str) -> Result<f64, ModelError> {
    row.metric(metric).ok_or_else(|| ModelError::MissingValue {
        row: row.id,
        metric: metric.to_string(),
    })
}

fn dot(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(values)
        .fold(0.0, |total, (coefficient, value)| total + coefficient * value)
}
