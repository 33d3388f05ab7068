use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::selection::router::{select_handler, CatalogBody, SelectionBody};
use crate::selection::selection_router;

fn body(criteria: &str, constraints: Option<&str>) -> SelectionBody {
    SelectionBody {
        csv: SCENARIO_CSV.to_string(),
        criteria: criteria.to_string(),
        constraints: constraints.map(str::to_string),
        team_size: None,
        unbounded: false,
        mode: None,
    }
}

#[tokio::test]
async fn select_handler_returns_ranked_team() {
    let selector = Arc::new(exhaustive_selector(2));

    let response = select_handler::<ExhaustiveEngine>(
        State(selector),
        axum::Json(body("goals=1,fouls=-1", Some("fouls<=1"))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let names: Vec<&str> = payload["team"]
        .as_array()
        .expect("team array")
        .iter()
        .filter_map(|candidate| candidate["name"].as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(payload["team_score"], json!(7.0));
    assert_eq!(payload["mode"], json!("binary"));
}

#[tokio::test]
async fn select_handler_cites_the_offending_token() {
    let selector = Arc::new(exhaustive_selector(2));

    let response =
        select_handler::<ExhaustiveEngine>(State(selector), axum::Json(body("goals=abc", None)))
            .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["token"], json!("goals=abc"));
    assert_eq!(payload["reason"], json!("non_numeric_value"));
}

#[tokio::test]
async fn select_handler_rejects_ragged_csv() {
    let selector = Arc::new(exhaustive_selector(2));
    let mut ragged = body("goals=1", None);
    ragged.csv = "name,goals\nA,1,extra\n".to_string();

    let response = select_handler::<ExhaustiveEngine>(State(selector), axum::Json(ragged)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn select_handler_reports_infeasible_status() {
    let selector = Arc::new(exhaustive_selector(2));

    let response = select_handler::<ExhaustiveEngine>(
        State(selector),
        axum::Json(body("goals=1", Some("fouls>=10"))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["solver_status"], json!("infeasible"));
}

#[tokio::test]
async fn selection_route_honours_team_size_override() {
    let router = selection_router(Arc::new(exhaustive_selector(2)));
    let request_body = json!({
        "csv": SCENARIO_CSV,
        "criteria": "goals=1",
        "team_size": 1,
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/selection")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&request_body).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["team"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["team"][0]["name"], json!("A"));
    assert_eq!(payload["roster"], json!({ "kind": "fixed", "size": 1 }));
}

#[tokio::test]
async fn metrics_route_lists_numeric_columns() {
    let router = selection_router(Arc::new(exhaustive_selector(2)));
    let catalog = json!({ "csv": SCENARIO_CSV });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/selection/metrics")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&catalog).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = read_json_body(response).await;
    assert_eq!(payload["metrics"], json!(["goals", "fouls"]));
}

#[tokio::test]
async fn catalog_body_without_name_column_is_unprocessable() {
    let selector = Arc::new(exhaustive_selector(2));

    let response = crate::selection::router::catalog_handler::<ExhaustiveEngine>(
        State(selector),
        axum::Json(CatalogBody {
            csv: "player,goals\nA,1\n".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
