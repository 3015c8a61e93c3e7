use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::adapt::Level;
use crate::app::page::render_page;
use crate::app::state::{AppState, sidebar_or_empty};
use crate::formats::{CacheCleared, CacheStatus, ContentBlock, TutorialPage};
use crate::tutorial::{DEFAULT_TUTORIAL, tutorial_filename};

const CACHE_STATUS_SAMPLE: usize = 10;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/tutorial") }))
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/tutorial", get(tutorial_index))
        .route("/tutorial/:name", get(tutorial_named))
        .route("/api/tutorial/:name", get(tutorial_json))
        .route("/adapt-content", post(adapt_content))
        .route("/clear-cache", post(clear_cache))
        .route("/cache-status", get(cache_status))
        .route("/slider-update", post(slider_update))
        .route("/get-slider-states", get(slider_states))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!(%err, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    lang: Option<String>,
}

async fn tutorial_index(
    State(state): State<AppState>,
    Query(q): Query<LangQuery>,
) -> Result<Html<String>, ApiError> {
    tutorial_html(state, None, q.lang).await
}

async fn tutorial_named(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(q): Query<LangQuery>,
) -> Result<Html<String>, ApiError> {
    tutorial_html(state, Some(name), q.lang).await
}

async fn tutorial_html(
    state: AppState,
    name: Option<String>,
    lang: Option<String>,
) -> Result<Html<String>, ApiError> {
    let filename = tutorial_filename(name.as_deref());
    let language = state.language(lang);
    let loader = Arc::clone(&state.loader);
    let nav_path = state.nav_path.clone();

    let html = tokio::task::spawn_blocking(move || {
        let page = loader.load(&filename, &language);
        let sidebar = sidebar_or_empty(&nav_path);
        render_page(&page, &sidebar, &filename, &language)
    })
    .await
    .map_err(ApiError::internal)?;
    Ok(Html(html))
}

async fn tutorial_json(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(q): Query<LangQuery>,
) -> Result<Json<TutorialPage>, ApiError> {
    let filename = tutorial_filename(Some(&name));
    let language = state.language(q.lang);
    let loader = Arc::clone(&state.loader);

    let page = tokio::task::spawn_blocking(move || loader.load(&filename, &language))
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(page))
}

fn default_level() -> i64 {
    2
}

fn default_filename() -> String {
    DEFAULT_TUTORIAL.to_owned()
}

#[derive(Debug, Deserialize)]
pub struct AdaptRequest {
    section_id: String,
    #[serde(default = "default_level")]
    level: i64,
    #[serde(default = "default_filename")]
    filename: String,
}

#[derive(Debug, Serialize)]
pub struct AdaptResponse {
    status: &'static str,
    section_id: String,
    level: i64,
    adapted_content: Vec<ContentBlock>,
}

async fn adapt_content(
    State(state): State<AppState>,
    Query(q): Query<LangQuery>,
    Json(req): Json<AdaptRequest>,
) -> Result<Json<AdaptResponse>, ApiError> {
    let filename = tutorial_filename(Some(&req.filename));
    let language = state.language(q.lang);
    let loader = Arc::clone(&state.loader);
    let adapter = state.adapter.clone();
    let section_id = req.section_id.clone();
    let level = Level::from_index(req.level);

    let adapted = tokio::task::spawn_blocking(move || {
        let page = loader.load(&filename, &language);
        page.section(&section_id).map(|section| {
            section
                .content
                .iter()
                .map(|block| adapter.adapt_block(block, level, &section.title))
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(ApiError::internal)?;

    let Some(adapted_content) = adapted else {
        return Err(ApiError::not_found("Section not found"));
    };

    tracing::debug!(
        section_id = %req.section_id,
        level = level.name(),
        blocks = adapted_content.len(),
        "adapted section"
    );
    Ok(Json(AdaptResponse {
        status: "success",
        section_id: req.section_id,
        level: req.level,
        adapted_content,
    }))
}

async fn clear_cache(State(state): State<AppState>) -> Result<Json<CacheCleared>, ApiError> {
    let removed = state.cache().clear().map_err(ApiError::internal)?;
    tracing::info!(removed, "adaptation cache cleared");
    Ok(Json(CacheCleared {
        status: "success".to_owned(),
        message: format!("Cache cleared. Removed {removed} items."),
        cache_size: removed,
    }))
}

async fn cache_status(State(state): State<AppState>) -> Result<Json<CacheStatus>, ApiError> {
    let cache = state.cache();
    Ok(Json(CacheStatus {
        cache_size: cache.size().map_err(ApiError::internal)?,
        cached_items: cache
            .keys(CACHE_STATUS_SAMPLE)
            .map_err(ApiError::internal)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SliderUpdate {
    section_id: String,
    level: i64,
}

async fn slider_update(
    State(state): State<AppState>,
    Json(update): Json<SliderUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .sliders
        .update(&update.section_id, update.level)
        .map_err(ApiError::internal)?;
    Ok(Json(serde_json::json!({ "status": "success" })))
}

async fn slider_states(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, i64>>, ApiError> {
    let states = state.sliders.snapshot().map_err(ApiError::internal)?;
    Ok(Json(states))
}
