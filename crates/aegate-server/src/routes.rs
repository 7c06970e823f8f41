//! HTTP API routes for the dashboard UI
//!
//! Four JSON endpoints over warp: health, dataset listing, dataset schema
//! introspection, and query execution. Every failure reply carries
//! well-formed empty result fields (`datasets: []`, `columns: []`,
//! `data: []`) so the renderer can treat all responses uniformly.

use aegate_core::{AegateError, AnalyticsClient, Params};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Body of `POST /api/query`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub params: Option<Params>,
}

/// The full API filter chain, with a permissive CORS layer for local
/// dashboard development
pub fn api(
    client: AnalyticsClient,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["POST", "GET"]);

    health()
        .or(datasets(client.clone()))
        .or(dataset_schema(client.clone()))
        .or(query(client))
        .with(cors)
}

fn with_client(
    client: AnalyticsClient,
) -> impl Filter<Extract = (AnalyticsClient,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})))
}

fn datasets(
    client: AnalyticsClient,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "datasets")
        .and(warp::get())
        .and(with_client(client))
        .and_then(handle_datasets)
}

fn dataset_schema(
    client: AnalyticsClient,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "datasets" / String / "schema")
        .and(warp::get())
        .and(with_client(client))
        .and_then(handle_dataset_schema)
}

fn query(
    client: AnalyticsClient,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "query")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_client(client))
        .and_then(handle_query)
}

async fn handle_datasets(client: AnalyticsClient) -> Result<impl Reply, Rejection> {
    let reply = match client.list_datasets().await {
        Ok(datasets) => json_with_status(json!({"datasets": datasets}), StatusCode::OK),
        Err(AegateError::Config(message)) => json_with_status(
            json!({
                "error": "Missing configuration",
                "message": message,
                "datasets": [],
            }),
            StatusCode::BAD_REQUEST,
        ),
        // Deliberately 200: the UI falls back to manual dataset entry
        Err(AegateError::Upstream { message, .. }) => {
            tracing::error!(%message, "failed to list datasets");
            json_with_status(
                json!({
                    "error": "Could not fetch datasets",
                    "details": message,
                    "datasets": [],
                }),
                StatusCode::OK,
            )
        }
        Err(other) => json_with_status(
            json!({
                "error": "Failed to fetch datasets",
                "message": other.to_string(),
                "datasets": [],
            }),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    };
    Ok(reply)
}

async fn handle_dataset_schema(
    dataset_id: String,
    client: AnalyticsClient,
) -> Result<impl Reply, Rejection> {
    let reply = match client.dataset_schema(&dataset_id).await {
        Ok(columns) => json_with_status(
            json!({"datasetId": dataset_id, "columns": columns}),
            StatusCode::OK,
        ),
        Err(AegateError::Config(_)) => json_with_status(
            json!({"error": "Missing configuration", "columns": []}),
            StatusCode::BAD_REQUEST,
        ),
        Err(AegateError::Upstream { message, .. }) => json_with_status(
            json!({
                "error": "Failed to fetch schema",
                "details": message,
                "columns": [],
            }),
            StatusCode::BAD_GATEWAY,
        ),
        Err(other) => json_with_status(
            json!({
                "error": "Failed to fetch schema",
                "message": other.to_string(),
                "columns": [],
            }),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    };
    Ok(reply)
}

async fn handle_query(
    request: QueryRequest,
    client: AnalyticsClient,
) -> Result<impl Reply, Rejection> {
    let params = request.params.unwrap_or_default();
    let reply = match client.run_query(&request.query, &params).await {
        Ok(result) => json_with_status(
            serde_json::to_value(&result).unwrap_or_else(|_| json!({})),
            StatusCode::OK,
        ),
        Err(AegateError::Config(message)) => json_with_status(
            json!({
                "error": "Missing configuration",
                "message": message,
                "data": [],
                "meta": null,
            }),
            StatusCode::BAD_REQUEST,
        ),
        Err(AegateError::Upstream { message, query }) => json_with_status(
            json!({
                "error": "Query execution failed",
                "message": message,
                "query": query,
                "data": [],
                "meta": null,
            }),
            StatusCode::BAD_GATEWAY,
        ),
        Err(other) => json_with_status(
            json!({
                "error": "Query execution failed",
                "message": other.to_string(),
                "data": [],
                "meta": null,
            }),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    };
    Ok(reply)
}

fn json_with_status(body: serde_json::Value, status: StatusCode) -> impl Reply {
    warp::reply::with_status(warp::reply::json(&body), status)
}
