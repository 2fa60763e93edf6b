use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use screening_storage::UpsertOutcome;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CorrectionRequest {
    pub full_name: String,
    /// Any date form the identity normalizer accepts.
    pub date_of_birth: String,
    pub value: f64,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CorrectionResponse {
    Updated { row: usize },
    Appended,
}

impl From<UpsertOutcome> for CorrectionResponse {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Updated { row } => CorrectionResponse::Updated { row },
            UpsertOutcome::Appended => CorrectionResponse::Appended,
        }
    }
}

/// Write one correction. The next dataset read refreshes and applies it.
pub async fn record_correction(
    State(state): State<AppState>,
    Json(req): Json<CorrectionRequest>,
) -> Result<Json<CorrectionResponse>, ApiError> {
    let dataset = state.dataset;
    let outcome = tokio::task::spawn_blocking(move || {
        dataset.record_correction(&req.full_name, &req.date_of_birth, req.value)
    })
    .await??;
    Ok(Json(outcome.into()))
}
