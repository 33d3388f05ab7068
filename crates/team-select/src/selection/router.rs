use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dataset::Dataset;
use super::domain::{RosterSize, SelectionMode};
use super::error::SelectionError;
use super::service::{SelectionRequest, TeamSelector};
use super::solver::SolverEngine;

/// JSON body for `POST /api/v1/selection`.
#[derive(Debug, Deserialize)]
pub struct SelectionBody {
    pub csv: String,
    pub criteria: String,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub team_size: Option<usize>,
    #[serde(default)]
    pub unbounded: bool,
    #[serde(default)]
    pub mode: Option<SelectionMode>,
}

impl SelectionBody {
    fn request(&self) -> SelectionRequest {
        let roster = if self.unbounded {
            Some(RosterSize::Unbounded)
        } else {
            self.team_size.map(RosterSize::Fixed)
        };

        SelectionRequest {
            criteria: self.criteria.clone(),
            constraints: self.constraints.clone(),
            roster,
            mode: self.mode,
        }
    }
}

/// JSON body for `POST /api/v1/selection/metrics`.
#[derive(Debug, Deserialize)]
pub struct CatalogBody {
    pub csv: String,
}

/// Router exposing the selection pipeline over HTTP.
pub fn selection_router<E>(selector: Arc<TeamSelector<E>>) -> Router
where
    E: SolverEngine + Send + Sync + 'static,
{
    Router::new()
        .route("/api/v1/selection", post(select_handler::<E>))
        .route("/api/v1/selection/metrics", post(catalog_handler::<E>))
        .with_state(selector)
}

pub(crate) async fn select_handler<E>(
    State(selector): State<Arc<TeamSelector<E>>>,
    axum::Json(body): axum::Json<SelectionBody>,
) -> Response
where
    E: SolverEngine + Send + Sync + 'static,
{
    let dataset = match Dataset::from_reader(Cursor::new(body.csv.as_bytes())) {
        Ok(dataset) => dataset,
        Err(error) => return error_response(SelectionError::Dataset(error)),
    };

    match selector.select(&dataset, &body.request()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn catalog_handler<E>(
    State(selector): State<Arc<TeamSelector<E>>>,
    axum::Json(body): axum::Json<CatalogBody>,
) -> Response
where
    E: SolverEngine + Send + Sync + 'static,
{
    let catalog = Dataset::from_reader(Cursor::new(body.csv.as_bytes()))
        .map_err(SelectionError::Dataset)
        .and_then(|dataset| selector.catalog(&dataset));

    match catalog {
        Ok(catalog) => {
            let payload = json!({ "metrics": catalog.metrics() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: SelectionError) -> Response {
    let mut payload = json!({ "error": error.to_string() });

    let status = match &error {
        SelectionError::Dataset(_) => StatusCode::BAD_REQUEST,
        SelectionError::Parse(parse) => {
            payload["token"] = json!(parse.token);
            payload["reason"] = json!(parse.reason);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SelectionError::Solve(failure) => {
            payload["solver_status"] = json!(failure.status);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SelectionError::Schema(_) | SelectionError::Model(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    (status, axum::Json(payload)).into_response()
}
