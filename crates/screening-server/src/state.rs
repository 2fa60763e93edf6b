use std::sync::Arc;

use screening_export::styles::DocumentStyles;
use screening_reconcile::Dataset;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub styles: Arc<DocumentStyles>,
    /// TrueType font for PDF reports. Without it PDFs use builtin Helvetica.
    pub pdf_font: Option<Arc<Vec<u8>>>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            styles: Arc::new(DocumentStyles::default()),
            pdf_font: None,
        }
    }

    pub fn with_styles(mut self, styles: DocumentStyles) -> Self {
        self.styles = Arc::new(styles);
        self
    }

    pub fn with_pdf_font(mut self, font: Vec<u8>) -> Self {
        self.pdf_font = Some(Arc::new(font));
        self
    }
}
