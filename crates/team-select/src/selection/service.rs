use tracing::info;

use crate::config::SelectionConfig;

use super::dataset::Dataset;
use super::domain::{RosterSize, SelectionMode};
use super::error::SelectionError;
use super::expression::{parse_constraints, parse_criteria};
use super::filter::filter_complete_rows;
use super::model::build_model;
use super::ranker::rank;
use super::report::SelectionReport;
use super::schema::{validate_schema, MetricCatalog};
use super::solver::{solve, GoodLpEngine, SolverEngine};

/// User input for one run. Unset overrides fall back to the selector's
/// configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionRequest {
    pub criteria: String,
    pub constraints: Option<String>,
    pub roster: Option<RosterSize>,
    pub mode: Option<SelectionMode>,
}

impl SelectionRequest {
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
            ..Self::default()
        }
    }

    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    pub fn with_roster(mut self, roster: RosterSize) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Runs the validate, parse, filter, build, solve, rank pipeline.
///
/// Holds no per-run state; every call starts from the dataset snapshot.
pub struct TeamSelector<E = GoodLpEngine> {
    engine: E,
    config: SelectionConfig,
}

impl TeamSelector<GoodLpEngine> {
    pub fn new(config: SelectionConfig) -> Self {
        Self::with_engine(GoodLpEngine, config)
    }
}

impl<E> TeamSelector<E>
where
    E: SolverEngine,
{
    pub fn with_engine(engine: E, config: SelectionConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Metric catalog of `dataset`, for listing what criteria may name.
    pub fn catalog(&self, dataset: &Dataset) -> Result<MetricCatalog, SelectionError> {
        Ok(validate_schema(dataset.columns())?)
    }

    pub fn select(
        &self,
        dataset: &Dataset,
        request: &SelectionRequest,
    ) -> Result<SelectionReport, SelectionError> {
        let roster = request.roster.unwrap_or(self.config.roster);
        let mode = request.mode.unwrap_or(self.config.mode);

        let catalog = validate_schema(dataset.columns())?;
        let objective = parse_criteria(&request.criteria, &catalog)?;
        let constraints = match request.constraints.as_deref() {
            Some(text) if !text.trim().is_empty() => parse_constraints(text, &catalog)?,
            _ => Vec::new(),
        };

        let rows = dataset.candidates(&catalog)?;
        let filtered = filter_complete_rows(rows, &objective, &constraints);

        let model = build_model(&filtered.eligible, &objective, &constraints, roster, mode)?;
        let assignment = solve(&model, &self.engine)?;
        let team = rank(&filtered.eligible, &assignment, &objective, mode, roster);

        let report = SelectionReport::assemble(&model, &assignment, team, filtered.excluded);
        info!(
            selected = report.team.len(),
            eligible = report.eligible_rows,
            excluded = report.excluded_rows,
            mode = mode.label(),
            "team selected"
        );

        Ok(report)
    }
}
