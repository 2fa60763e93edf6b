use std::io::{BufWriter, Cursor};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::ExportError;
use crate::styles::DocumentStyles;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
/// Millimetres per typographic point.
const PT: f32 = 0.3528;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Page geometry derived from the document styles.
struct Layout {
    top: f32,
    bottom: f32,
    left: f32,
    answer_x: f32,
    body: f32,
    headings: [f32; 3],
}

impl Layout {
    fn new(styles: &DocumentStyles) -> Self {
        let margin = styles.margin_mm.clamp(5.0, 60.0);
        let usable = PAGE_WIDTH - 2.0 * margin;
        Self {
            top: PAGE_HEIGHT - margin,
            bottom: margin,
            left: margin,
            answer_x: margin + usable * 0.68,
            body: styles.body_size as f32,
            headings: [1, 2, 3].map(|level| styles.heading_size(level) as f32),
        }
    }

    fn line_height(size: f32) -> f32 {
        size * PT * 1.3
    }

    /// Rough characters per line for `width` millimetres at `size` points.
    fn chars(width: f32, size: f32) -> usize {
        ((width / (size * PT * 0.55)) as usize).max(10)
    }

    fn question_chars(&self) -> usize {
        Self::chars(self.answer_x - self.left - 4.0, self.body)
    }

    fn answer_chars(&self) -> usize {
        Self::chars(PAGE_WIDTH - self.left - self.answer_x, self.body)
    }

    fn body_chars(&self) -> usize {
        Self::chars(PAGE_WIDTH - 2.0 * self.left, self.body)
    }
}

/// Writes lines top to bottom, starting a new page when the cursor reaches
/// the bottom margin.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layout: &'a Layout,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn ensure_room(&mut self, height: f32) {
        if self.y - height < self.layout.bottom {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.layout.top;
    }

    fn text(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn heading(&mut self, text: &str, level: usize, font: &IndirectFontRef) {
        let size = self.layout.headings[level - 1];
        let height = Layout::line_height(size);
        self.ensure_room(height * 2.0);
        if level > 1 {
            self.y -= height * 0.5;
        }
        self.text(text, size, self.layout.left, font);
        self.y -= height * 1.2;
    }
}

/// Generate a PDF from rendered report text (same subset as the DOCX
/// writer). With `font` set, every line uses that TrueType font, bold lines
/// included; otherwise Helvetica and Helvetica-Bold.
pub fn generate_pdf(
    title: &str,
    rendered: &str,
    styles: &DocumentStyles,
    font: Option<&[u8]>,
) -> Result<Vec<u8>, ExportError> {
    let layout = Layout::new(styles);
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = load_fonts(&doc, font)?;

    let mut writer = PageWriter {
        doc: &doc,
        layout: &layout,
        layer: doc.get_page(page1).get_layer(layer1),
        y: layout.top,
    };
    let line = Layout::line_height(layout.body);

    for raw in rendered.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            writer.y -= line * 0.6;
        } else if let Some(text) = trimmed.strip_prefix("### ") {
            writer.heading(text, 3, &fonts.bold);
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            writer.heading(text, 2, &fonts.bold);
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            writer.heading(text, 1, &fonts.bold);
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            let (question, answer) = split_answer(text);
            let question_lines = wrap_text(question, layout.question_chars());
            let answer_lines = wrap_text(answer, layout.answer_chars());
            let rows = question_lines.len().max(answer_lines.len());
            writer.ensure_room(rows as f32 * line);

            let top = writer.y;
            for (i, q) in question_lines.iter().enumerate() {
                writer.y = top - i as f32 * line;
                writer.text(q, layout.body, layout.left, &fonts.regular);
            }
            for (i, a) in answer_lines.iter().enumerate() {
                writer.y = top - i as f32 * line;
                writer.text(a, layout.body, layout.answer_x, &fonts.bold);
            }
            writer.y = top - rows as f32 * line - line * 0.3;
        } else if trimmed == "---" {
            writer.new_page();
        } else {
            let (text, font) = match trimmed.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
                Some(inner) => (inner, &fonts.bold),
                None => (trimmed, &fonts.regular),
            };
            for part in wrap_text(text, layout.body_chars()) {
                writer.ensure_room(line);
                writer.text(&part, layout.body, layout.left, font);
                writer.y -= line;
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
}

fn load_fonts(doc: &PdfDocumentReference, font: Option<&[u8]>) -> Result<Fonts, ExportError> {
    let font_error = |e: printpdf::Error| ExportError::Pdf(format!("font error: {e}"));
    match font {
        Some(bytes) => {
            let regular = doc
                .add_external_font(Cursor::new(bytes))
                .map_err(font_error)?;
            Ok(Fonts {
                bold: regular.clone(),
                regular,
            })
        }
        None => Ok(Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(font_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(font_error)?,
        }),
    }
}

/// `question: **answer**` → (question, answer). Lines without a bold answer
/// are all question.
fn split_answer(text: &str) -> (&str, &str) {
    match text.rfind(": **") {
        Some(idx) if text.ends_with("**") && idx + 4 <= text.len() - 2 => {
            (&text[..idx], &text[idx + 4..text.len() - 2])
        }
        _ => (text, ""),
    }
}

/// Greedy word wrap by character count.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len + word_len + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
