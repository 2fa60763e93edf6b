//! screening-export
//!
//! Per-patient screening report: assembled from a reconciled record, rendered
//! through a Tera template, written out as DOCX or PDF.

pub mod docx;
pub mod error;
pub mod pdf;
pub mod render;
pub mod report;
pub mod styles;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::report::ReportRequest;
use crate::styles::DocumentStyles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Docx,
    Pdf,
}

impl ReportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Docx => "docx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

/// Render `request` with the default template and produce document bytes.
///
/// `styles` set typography and margins for both formats. `pdf_font` is a
/// TrueType font used for PDF text; without one the PDF falls
/// back to builtin Helvetica, which has no Cyrillic glyphs.
pub fn export_report(
    request: &ReportRequest,
    format: ReportFormat,
    styles: &DocumentStyles,
    pdf_font: Option<&[u8]>,
) -> Result<Vec<u8>, ExportError> {
    let rendered = render::render_report(request)?;
    let bytes = match format {
        ReportFormat::Docx => docx::generate_docx(&rendered, styles)?,
        ReportFormat::Pdf => pdf::generate_pdf(&request.patient_name, &rendered, styles, pdf_font)?,
    };
    tracing::debug!(
        patient = %request.patient_name,
        format = format.extension(),
        bytes = bytes.len(),
        "report exported"
    );
    Ok(bytes)
}
