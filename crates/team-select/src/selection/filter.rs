use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use super::domain::{CandidateRow, Constraint, Objective, RowId};
use super::schema::NAME_FIELD;

/// A row dropped because it has no name or a metric in use has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedRow {
    pub row_id: RowId,
    pub name: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowFilterOutcome {
    pub eligible: Vec<CandidateRow>,
    pub excluded: Vec<ExcludedRow>,
}

/// Metrics named by the objective or any constraint, sorted and unique.
pub fn referenced_metrics<'a>(
    objective: &'a Objective,
    constraints: &'a [Constraint],
) -> BTreeSet<&'a str> {
    objective
        .iter()
        .map(|(metric, _)| metric)
        .chain(constraints.iter().map(|constraint| constraint.metric.as_str()))
        .collect()
}

/// Splits rows into those with a name and every referenced metric and those
/// without. An unnamed row lists `name` among its missing fields.
/// Row ids are preserved so later stages still index the loaded dataset.
pub fn filter_complete_rows(
    rows: Vec<CandidateRow>,
    objective: &Objective,
    constraints: &[Constraint],
) -> RowFilterOutcome {
    let referenced = referenced_metrics(objective, constraints);
    let mut eligible = Vec::with_capacity(rows.len());
    let mut excluded = Vec::new();

    for row in rows {
        let mut missing: Vec<String> = Vec::new();
        if row.name.trim().is_empty() {
            missing.push(NAME_FIELD.to_string());
        }
        missing.extend(
            referenced
                .iter()
                .filter(|metric| row.metric(metric).is_none())
                .map(|metric| metric.to_string()),
        );

        if missing.is_empty() {
            eligible.push(row);
        } else {
            excluded.push(ExcludedRow {
                row_id: row.id,
                name: row.name,
                missing,
            });
        }
    }

    if !excluded.is_empty() {
        info!(
            excluded = excluded.len(),
            eligible = eligible.len(),
            "excluded candidates with missing names or metric values"
        );
    }

    RowFilterOutcome { eligible, excluded }
}
