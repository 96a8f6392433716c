//! Web dashboard: page shell, JSON API and panel endpoints

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::BackendClient;
use crate::chart::ChartSpec;
use crate::detail::{show_location_detail, DetailOutcome};
use crate::map::TileLayer;
use crate::markers::{fetch_locations, MarkerId};
use crate::models::{PredictionInputs, WarningInputs};
use crate::page::render_index;
use crate::panel::render_loading;
use crate::state::{AppState, StateHandle};
use crate::theme::Theme;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub state: StateHandle,
    pub api: Arc<BackendClient>,
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle, api: Arc<BackendClient>, image_dir: &Path) -> Router {
    let dashboard_state = DashboardState { state, api };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/map", get(map_handler))
        .route("/api/markers", get(markers_handler))
        .route("/api/theme", get(theme_handler).post(set_theme_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/early-warning", post(early_warning_handler))
        .route("/panel/{marker_id}", get(panel_handler))
        .route("/panel/{marker_id}/loading", get(loading_handler))
        .nest_service("/data/image", ServeDir::new(image_dir))
        .layer(cors)
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let theme = dashboard.state.read().await.theme.theme();
    Html(render_index(theme))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn map_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    Json(state.viewport.clone())
}

async fn markers_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let fallback = dashboard.state.read().await.fallback_locations.clone();
    let load = fetch_locations(&dashboard.api, &fallback).await;

    let mut state = dashboard.state.write().await;
    Json(state.place_markers(&load))
}

/// Identifies the open page a panel or theme request comes from
#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    #[serde(default)]
    session: String,
}

async fn loading_handler(
    State(dashboard): State<DashboardState>,
    UrlPath(marker_id): UrlPath<u64>,
) -> Response {
    let state = dashboard.state.read().await;
    match state.markers.get(MarkerId(marker_id)) {
        Some(marker) => Html(render_loading(&marker.location)).into_response(),
        None => unknown_marker(marker_id),
    }
}

async fn panel_handler(
    State(dashboard): State<DashboardState>,
    UrlPath(marker_id): UrlPath<u64>,
    Query(page): Query<PageQuery>,
) -> Response {
    let outcome = show_location_detail(
        &dashboard.state,
        &dashboard.api,
        &page.session,
        MarkerId(marker_id),
    )
    .await;
    outcome_response(marker_id, outcome)
}

fn outcome_response(marker_id: u64, outcome: DetailOutcome) -> Response {
    match outcome {
        DetailOutcome::Displayed(panel) => Json(panel).into_response(),
        DetailOutcome::Superseded { generation } => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "Superseded by a newer panel request",
                "generation": generation,
            })),
        )
            .into_response(),
        DetailOutcome::UnknownMarker => unknown_marker(marker_id),
    }
}

fn unknown_marker(marker_id: u64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("Unknown marker {}", marker_id) })),
    )
        .into_response()
}

/// Theme state handed to the page script after a change
#[derive(Debug, Serialize)]
struct ThemeResponse {
    theme: Theme,
    toggle_label: &'static str,
    toggle_icon: &'static str,
    tile_layer: TileLayer,
    charts: BTreeMap<String, ChartSpec>,
}

impl ThemeResponse {
    /// Theme state plus the live charts of one page
    fn from_state(state: &AppState, session: &str) -> Self {
        let theme = state.theme.theme();
        Self {
            theme,
            toggle_label: theme.toggle_label(),
            toggle_icon: theme.toggle_icon(),
            tile_layer: state.viewport.tile_layer.clone(),
            charts: state
                .session(session)
                .map(|page| {
                    page.charts
                        .iter()
                        .map(|(id, spec)| (id.to_string(), spec.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    theme: Theme,
}

async fn theme_handler(
    State(dashboard): State<DashboardState>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    Json(ThemeResponse::from_state(&state, &page.session))
}

async fn set_theme_handler(
    State(dashboard): State<DashboardState>,
    Query(page): Query<PageQuery>,
    Json(request): Json<ThemeRequest>,
) -> impl IntoResponse {
    let (response, save) = {
        let mut state = dashboard.state.write().await;
        let save = state.set_theme(request.theme);
        (ThemeResponse::from_state(&state, &page.session), save)
    };
    save.persist().await;
    Json(response)
}

async fn predict_handler(
    State(dashboard): State<DashboardState>,
    Json(inputs): Json<PredictionInputs>,
) -> Response {
    match dashboard.api.predict_debris(&inputs).await {
        Ok(prediction) => Json(prediction).into_response(),
        Err(e) => backend_failure("Prediction", e),
    }
}

async fn early_warning_handler(
    State(dashboard): State<DashboardState>,
    Json(inputs): Json<WarningInputs>,
) -> Response {
    match dashboard.api.early_warning(&inputs).await {
        Ok(warning) => Json(warning).into_response(),
        Err(e) => backend_failure("Early warning", e),
    }
}

fn backend_failure(what: &str, error: crate::DebrisenseError) -> Response {
    tracing::warn!("{} request failed: {}", what, error);
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}
