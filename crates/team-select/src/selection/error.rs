use std::fmt;

use serde::Serialize;

use super::domain::RowId;

/// The dataset cannot be used for selection at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("dataset has no '{field}' column to display candidates by")]
    MissingNameField { field: &'static str },
    #[error("dataset has no numeric metric columns")]
    NoNumericMetrics,
    #[error("dataset repeats the column '{0}'")]
    DuplicateColumn(String),
}

/// Why a criteria or constraint expression was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorReason {
    /// Item is blank or does not split into exactly two sides.
    MalformedItem,
    NonNumericValue,
    UnknownMetric,
    DuplicateMetric,
    NoComparator,
    EmptyCriteria,
    EmptyConstraints,
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorReason::MalformedItem => "expected exactly one 'metric=value' pair",
            ParseErrorReason::NonNumericValue => "value is not a finite number",
            ParseErrorReason::UnknownMetric => "metric is not in the dataset catalog",
            ParseErrorReason::DuplicateMetric => "metric is weighted more than once",
            ParseErrorReason::NoComparator => "no comparator found (use <=, >= or =)",
            ParseErrorReason::EmptyCriteria => "at least one criterion is required",
            ParseErrorReason::EmptyConstraints => "constraint list is empty",
        };
        f.write_str(text)
    }
}

/// Malformed user input; nothing from the rejected call is applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}: '{token}'")]
pub struct ParseError {
    pub reason: ParseErrorReason,
    pub token: String,
}

impl ParseError {
    pub(crate) fn new(reason: ParseErrorReason, token: impl Into<String>) -> Self {
        Self {
            reason,
            token: token.into(),
        }
    }
}

/// The model is infeasible or incomplete by construction; raised before solving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("team size {team_size} exceeds the {eligible} eligible candidates")]
    TeamSizeExceedsRows { team_size: usize, eligible: usize },
    #[error("team size must be at least 1")]
    EmptyTeam,
    #[error("no eligible candidates remain to select from")]
    NoEligibleRows,
    #[error("candidate {row} has no value for metric '{metric}'")]
    MissingValue { row: RowId, metric: String },
}

/// Terminal status reported by a solving engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl SolverStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SolverStatus::Optimal => "Optimal",
            SolverStatus::Infeasible => "Infeasible",
            SolverStatus::Unbounded => "Unbounded",
            SolverStatus::NotSolved => "Not Solved",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The engine did not produce an optimal assignment. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("solver finished with status {status}{}", detail_suffix(.detail))]
pub struct SolveFailure {
    pub status: SolverStatus,
    pub detail: Option<String>,
}

impl SolveFailure {
    pub(crate) fn new(status: SolverStatus) -> Self {
        Self {
            status,
            detail: None,
        }
    }

    pub(crate) fn with_detail(status: SolverStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: Some(detail.into()),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

/// Failure to read or decode the tabular source.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Any failure of a selection run.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("no optimal selection: {0}")]
    Solve(#[from] SolveFailure),
}
