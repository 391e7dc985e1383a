//! Router and request handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::ApiError;
use crate::service::ChartDataService;
use crate::types::ChartData;
use crate::version_string;

/// Path of the chart endpoint.
pub const CHART_DATA_PATH: &str = "/v1/occon25/chart-data";

/// Query string of the chart endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChartQuery {
    /// Bypass the cache and run a capped, unrestricted aggregation.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub debug: bool,
}

/// Build the application router around a shared service.
pub fn router(service: Arc<ChartDataService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(CHART_DATA_PATH, get(chart_data))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": version_string(),
    }))
}

async fn chart_data(
    State(service): State<Arc<ChartDataService>>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartData>, ApiError> {
    let chart = service.get_chart_data(query.debug).await?;
    Ok(Json(ChartData::clone(&chart)))
}

/// Accept the usual spellings of a boolean flag in a query string:
/// `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off` and `t`/`f`, `y`/`n`
/// (case-insensitive).
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value {other:?}"
        ))),
    }
}
