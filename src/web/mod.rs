pub mod figure;
pub mod page;

use crate::core::controller::{DashboardController, Phase};
use crate::core::view::KpiSummary;
use crate::domain::model::Regime;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub regimen: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub show_content: bool,
    pub departments: Option<usize>,
    pub merged: Option<usize>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub regime: Regime,
    pub phase: Phase,
    pub map: serde_json::Value,
    pub distribution: serde_json::Value,
    pub kpis: KpiSummary,
    pub narrative: String,
}

pub fn build_router(controller: DashboardController) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(status))
        .route("/api/dashboard", get(dashboard))
        .with_state(controller)
}

async fn index() -> Html<String> {
    Html(page::render_page())
}

async fn status(State(controller): State<DashboardController>) -> Json<StatusResponse> {
    let dataset = controller.store().dataset();

    Json(StatusResponse {
        phase: controller.phase(),
        show_content: controller.show_content(),
        departments: dataset.as_ref().map(|d| d.raw.len()),
        merged: dataset.as_ref().map(|d| d.merged.len()),
        loaded_at: dataset.as_ref().map(|d| d.loaded_at),
    })
}

async fn dashboard(
    State(controller): State<DashboardController>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<ApiError>)> {
    let regime = match query.regimen.as_deref() {
        None | Some("") => Regime::default(),
        Some(name) => name.parse::<Regime>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: e.to_string(),
                }),
            )
        })?,
    };

    let view = controller.update(regime);

    Ok(Json(DashboardResponse {
        regime,
        phase: controller.phase(),
        map: figure::map_figure(&view.map),
        distribution: figure::distribution_figure(&view.distribution),
        kpis: view.kpis,
        narrative: view.narrative,
    }))
}
