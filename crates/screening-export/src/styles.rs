use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Typography and page geometry shared by the DOCX and PDF writers.
///
/// Deployments override it from a JSON file; missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// DOCX font family. Must carry Cyrillic glyphs. The PDF writer embeds
    /// its font from bytes instead.
    pub font_family: String,

    /// Body and answer text, in points.
    pub body_size: usize,

    /// `#`, `##` and `###` headings, in points.
    pub heading_sizes: [usize; 3],

    /// Uniform page margin in millimetres.
    pub margin_mm: f32,
}

impl DocumentStyles {
    /// Parse an override file. Fields it omits keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Size of a heading level (1 to 3; out-of-range levels are clamped).
    pub fn heading_size(&self, level: usize) -> usize {
        self.heading_sizes[level.clamp(1, 3) - 1]
    }
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            body_size: 10,
            heading_sizes: [16, 12, 11],
            margin_mm: 20.0,
        }
    }
}
