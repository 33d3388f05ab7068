//! Team selection pipeline: schema validation, expression parsing, model
//! construction, solving and ranking.

pub mod dataset;
pub mod domain;
pub mod error;
pub mod expression;
pub mod filter;
pub mod model;
pub mod ranker;
pub mod report;
pub mod router;
pub mod schema;
pub mod service;
pub mod solver;

#[cfg(test)]
mod tests;

pub use dataset::Dataset;
pub use domain::{
    CandidateRow, Comparator, Constraint, Criterion, Objective, RosterSize, RowId, SelectionMode,
};
pub use error::{
    DatasetError, ModelError, ParseError, ParseErrorReason, SchemaError, SelectionError,
    SolveFailure, SolverStatus,
};
pub use expression::{parse_constraints, parse_criteria};
pub use filter::{filter_complete_rows, ExcludedRow, RowFilterOutcome};
pub use model::{build_model, LinearConstraint, OptimizationModel, TEAM_SIZE_LABEL};
pub use ranker::{rank, RankedCandidate, SELECTION_TOLERANCE};
pub use report::{ConstraintCheck, SelectionReport};
pub use router::selection_router;
pub use schema::{validate_schema, ColumnKind, ColumnSchema, MetricCatalog};
pub use service::{SelectionRequest, TeamSelector};
pub use solver::{solve, Assignment, EngineOutput, GoodLpEngine, SolverEngine};
