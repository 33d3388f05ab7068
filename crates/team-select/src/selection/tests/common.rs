use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::response::Response;
use serde_json::Value;

use crate::config::SelectionConfig;
use crate::selection::domain::{CandidateRow, RosterSize, RowId, SelectionMode};
use crate::selection::error::SolverStatus;
use crate::selection::expression::{parse_constraints, parse_criteria};
use crate::selection::model::{build_model, OptimizationModel};
use crate::selection::schema::{catalog_for_tests, MetricCatalog};
use crate::selection::solver::{EngineOutput, SolverEngine};
use crate::selection::{Dataset, TeamSelector};

pub(crate) const SCENARIO_CSV: &str = "id,name,dob,nationality,goals,fouls\n\
1,A,1998-03-14,ENG,5,1\n\
2,B,2000-11-02,FRA,3,0\n\
3,C,1995-06-30,BRA,4,2\n";

pub(crate) fn catalog() -> MetricCatalog {
    catalog_for_tests(&["goals", "fouls"])
}

pub(crate) fn candidate(id: usize, name: &str, goals: f64, fouls: f64) -> CandidateRow {
    CandidateRow {
        id: RowId(id),
        name: name.to_string(),
        metrics: BTreeMap::from([("goals".to_string(), goals), ("fouls".to_string(), fouls)]),
        attributes: BTreeMap::new(),
    }
}

pub(crate) fn scenario_rows() -> Vec<CandidateRow> {
    vec![
        candidate(0, "A", 5.0, 1.0),
        candidate(1, "B", 3.0, 0.0),
        candidate(2, "C", 4.0, 2.0),
    ]
}

pub(crate) fn model_with_constraint(constraints: &str, mode: SelectionMode) -> OptimizationModel {
    let objective = parse_criteria("goals=1,fouls=-1", &catalog()).expect("criteria parse");
    let constraints = parse_constraints(constraints, &catalog()).expect("constraints parse");
    build_model(
        &scenario_rows(),
        &objective,
        &constraints,
        RosterSize::Fixed(2),
        mode,
    )
    .expect("model builds")
}

/// Criteria `goals=1,fouls=-1`, constraint `fouls<=1`, roster of two.
pub(crate) fn scenario_model(mode: SelectionMode) -> OptimizationModel {
    model_with_constraint("fouls<=1", mode)
}

pub(crate) fn scenario_dataset() -> Dataset {
    Dataset::from_reader(Cursor::new(SCENARIO_CSV)).expect("scenario dataset loads")
}

pub(crate) fn selection_config(team_size: usize) -> SelectionConfig {
    SelectionConfig {
        roster: RosterSize::Fixed(team_size),
        mode: SelectionMode::Binary,
    }
}

pub(crate) fn exhaustive_selector(team_size: usize) -> TeamSelector<ExhaustiveEngine> {
    TeamSelector::with_engine(ExhaustiveEngine, selection_config(team_size))
}

/// Brute-force binary engine for small models. Among optimal subsets the one
/// with the lowest bit mask wins.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExhaustiveEngine;

impl SolverEngine for ExhaustiveEngine {
    fn run(&self, model: &OptimizationModel) -> EngineOutput {
        if model.mode() != SelectionMode::Binary {
            return EngineOutput::failed(
                SolverStatus::NotSolved,
                Some("exhaustive engine only handles binary models".to_string()),
            );
        }

        let count = model.variables().len();
        let mut best: Option<(f64, Vec<f64>)> = None;

        for mask in 0u32..(1u32 << count) {
            let values: Vec<f64> = (0..count)
                .map(|bit| if mask & (1 << bit) != 0 { 1.0 } else { 0.0 })
                .collect();

            let feasible = model.constraints().iter().all(|constraint| {
                constraint
                    .comparator
                    .holds(constraint.activity(&values), constraint.rhs, 1e-9)
            });
            if !feasible {
                continue;
            }

            let value = model.objective_value(&values);
            if best.as_ref().map_or(true, |(current, _)| value > *current) {
                best = Some((value, values));
            }
        }

        match best {
            Some((_, values)) => EngineOutput::optimal(values),
            None => EngineOutput::failed(SolverStatus::Infeasible, None),
        }
    }
}

/// Counts calls and answers with a fixed output.
pub(crate) struct CountingEngine {
    pub(crate) calls: AtomicUsize,
    pub(crate) output: EngineOutput,
}

impl CountingEngine {
    pub(crate) fn new(output: EngineOutput) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            output,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SolverEngine for CountingEngine {
    fn run(&self, _model: &OptimizationModel) -> EngineOutput {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.clone()
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
