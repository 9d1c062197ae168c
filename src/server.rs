//! HTTP surface: `POST /analyze` plus static files for everything else.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::debug;

use crate::matcher::AnalysisResult;
use crate::vocabulary::VocabularyStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<VocabularyStore>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Json(rejection) => rejection.status(),
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub fn build_router(store: Arc<VocabularyStore>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_text))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

async fn analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(AnalyzeRequest { text }) = payload?;
    debug!(%text, "analyzing text");

    let (result, added) = state.store.analyze_and_record(&text);
    if added {
        // the response does not wait for the word list to hit the disk
        state.store.spawn_persist();
    }
    Ok(Json(result))
}
