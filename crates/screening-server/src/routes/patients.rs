use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use screening_core::models::patient::PatientRecord;
use screening_reconcile::corrections::CorrectionOutcome;
use screening_reconcile::dataset::{SkippedSource, Snapshot};

use crate::error::ApiError;
use crate::routes::current_snapshot;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SnapshotView {
    pub refreshed_at: jiff::Timestamp,
    pub patients: Vec<PatientRecord>,
    pub skipped: Vec<SkippedSource>,
    pub corrections: CorrectionOutcome,
}

impl From<&Snapshot> for SnapshotView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            refreshed_at: snapshot.refreshed_at,
            patients: snapshot.records.as_ref().clone(),
            skipped: snapshot.skipped.clone(),
            corrections: snapshot.corrections.clone(),
        }
    }
}

/// Refresh outcome without the records themselves.
#[derive(Serialize)]
pub struct RefreshSummary {
    pub refreshed_at: jiff::Timestamp,
    pub patients: usize,
    pub skipped: Vec<SkippedSource>,
    pub corrections: CorrectionOutcome,
}

pub async fn list_patients(State(state): State<AppState>) -> Result<Json<SnapshotView>, ApiError> {
    let snapshot = current_snapshot(state.dataset).await?;
    Ok(Json(SnapshotView::from(snapshot.as_ref())))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    let snapshot = current_snapshot(state.dataset).await?;
    let record = snapshot
        .patient(&name)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("patient not found: {name}")))?;
    Ok(Json(record))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshSummary>, ApiError> {
    let dataset = state.dataset;
    let snapshot = tokio::task::spawn_blocking(move || dataset.refresh()).await?;
    Ok(Json(RefreshSummary {
        refreshed_at: snapshot.refreshed_at,
        patients: snapshot.records.len(),
        skipped: snapshot.skipped.clone(),
        corrections: snapshot.corrections.clone(),
    }))
}
