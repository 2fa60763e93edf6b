use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;
use crate::report::ReportRequest;

/// Report layout in the Markdown subset the DOCX and PDF writers understand.
pub const DEFAULT_TEMPLATE: &str = r#"# Screening results: {{ patient_name }}
Generated: {{ as_of }}

## Summary
{{ summary }}

## Questionnaire details
{% for line in lines -%}
{% if line.kind == "section" -%}
### {{ line.title }}
**{{ line.conclusion }}**
{% elif line.kind == "answer" -%}
- {{ line.question }}: **{{ line.answer }}**
{% else %}
{% endif -%}
{% endfor -%}
"#;

/// Render a Tera template against any serializable value.
///
/// The `template_content` is the raw template string (Jinja2 syntax). The
/// value's fields become the template context variables.
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    value: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(value)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

pub fn render_report(request: &ReportRequest) -> Result<String, ExportError> {
    render_template("report.md", DEFAULT_TEMPLATE, request)
}
