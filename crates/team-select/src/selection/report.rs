use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Comparator, RosterSize, RowId, SelectionMode};
use super::filter::ExcludedRow;
use super::model::OptimizationModel;
use super::ranker::{RankedCandidate, SELECTION_TOLERANCE};
use super::solver::Assignment;

/// A model constraint re-evaluated against the final team only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintCheck {
    pub label: String,
    pub comparator: Comparator,
    pub threshold: f64,
    pub achieved: f64,
    pub satisfied: bool,
}

/// Outcome of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub mode: SelectionMode,
    pub roster: RosterSize,
    pub team: Vec<RankedCandidate>,
    pub team_score: f64,
    pub objective_value: f64,
    pub eligible_rows: usize,
    pub excluded_rows: usize,
    pub excluded: Vec<ExcludedRow>,
    pub constraint_checks: Vec<ConstraintCheck>,
}

impl SelectionReport {
    pub(crate) fn assemble(
        model: &OptimizationModel,
        assignment: &Assignment,
        team: Vec<RankedCandidate>,
        excluded: Vec<ExcludedRow>,
    ) -> Self {
        let chosen: BTreeSet<RowId> = team.iter().map(|candidate| candidate.row_id).collect();
        let indicator: Vec<f64> = model
            .variables()
            .iter()
            .map(|row| if chosen.contains(row) { 1.0 } else { 0.0 })
            .collect();

        let constraint_checks = model
            .constraints()
            .iter()
            .map(|constraint| {
                let achieved = constraint.activity(&indicator);
                ConstraintCheck {
                    label: constraint.label.clone(),
                    comparator: constraint.comparator,
                    threshold: constraint.rhs,
                    achieved,
                    satisfied: constraint.comparator.holds(
                        achieved,
                        constraint.rhs,
                        SELECTION_TOLERANCE,
                    ),
                }
            })
            .collect();

        let team_score = team
            .iter()
            .fold(0.0, |total, candidate| total + candidate.score);

        Self {
            mode: model.mode(),
            roster: model.roster(),
            team_score,
            objective_value: assignment.objective_value(),
            eligible_rows: model.variables().len(),
            excluded_rows: excluded.len(),
            excluded,
            constraint_checks,
            team,
        }
    }

    /// `(name, score)` pairs in rank order.
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.team
            .iter()
            .map(|candidate| (candidate.name.clone(), candidate.score))
            .collect()
    }

    /// Constraints the final team breaks. Only possible in fractional mode,
    /// where truncation happens after the solver.
    pub fn violations(&self) -> impl Iterator<Item = &ConstraintCheck> {
        self.constraint_checks.iter().filter(|check| !check.satisfied)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
