use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use screening_export::report::{build_report, default_sections};
use screening_export::{ReportFormat, export_report};

use crate::error::ApiError;
use crate::routes::current_snapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Render the printable report of one patient as DOCX or PDF.
pub async fn patient_report(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let snapshot = current_snapshot(state.dataset).await?;
    let record = snapshot
        .patient(&name)
        .ok_or_else(|| ApiError::NotFound(format!("patient not found: {name}")))?;

    let request = build_report(record, &default_sections(), jiff::Zoned::now().date());
    let format = query.format;
    let styles = state.styles;
    let font = state.pdf_font;
    let bytes = tokio::task::spawn_blocking(move || {
        export_report(&request, format, &styles, font.as_deref().map(Vec::as_slice))
    })
    .await??;

    let disposition = format!("attachment; filename=\"report.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
