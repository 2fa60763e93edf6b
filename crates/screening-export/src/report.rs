use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use screening_core::identity::display_date;
use screening_core::models::answer::Answer;
use screening_core::models::patient::{InstrumentId, PatientRecord};

pub const DEFAULT_SUMMARY: &str = "Detailed report of screening results and the patient's answers.";

/// One report section: which verdict heads it and which answers follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub instrument: InstrumentId,
    pub title: String,
    /// Answers whose label contains this key are listed under the section.
    pub search_key: String,
}

impl ReportSection {
    fn new(instrument: InstrumentId, title: &str, search_key: &str) -> Self {
        Self {
            instrument,
            title: title.to_string(),
            search_key: search_key.to_string(),
        }
    }
}

/// Sections in print order.
pub fn default_sections() -> Vec<ReportSection> {
    vec![
        ReportSection::new(InstrumentId::Score2, "SCORE2 (cardiovascular risk)", "SCORE2"),
        ReportSection::new(InstrumentId::Findrisc, "FINDRISC (diabetes)", "Findrisc"),
        ReportSection::new(InstrumentId::Phq9, "PHQ-9 (depression)", "PHQ"),
        ReportSection::new(InstrumentId::Gad7, "GAD-7 (anxiety)", "GAD"),
        ReportSection::new(InstrumentId::Audit, "AUDIT (alcohol)", "[ AUDIT]"),
        ReportSection::new(InstrumentId::Nicotine, "Nicotine dependence", "Паління"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportLine {
    Section { title: String, conclusion: String },
    Answer { question: String, answer: String },
    Spacer,
}

/// Everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub patient_name: String,
    /// Date the report was generated, already formatted for display.
    pub as_of: String,
    pub summary: String,
    pub lines: Vec<ReportLine>,
}

/// Assemble the printable report of one patient.
///
/// A section appears only when its instrument produced a verdict. Its answers
/// are listed in form order, skipping empty and "0" answers.
pub fn build_report(record: &PatientRecord, sections: &[ReportSection], as_of: Date) -> ReportRequest {
    let mut lines = Vec::new();
    for section in sections {
        let Some(outcome) = record.score(section.instrument) else {
            continue;
        };

        let mut conclusion = format!("CONCLUSION: {}", outcome.verdict.label);
        if let Some(score) = outcome.score {
            conclusion.push_str(&format!(" ({score} points)"));
        }
        lines.push(ReportLine::Section {
            title: section.title.clone(),
            conclusion,
        });

        lines.extend(
            record
                .answers
                .iter()
                .filter(|(label, _)| label.contains(section.search_key.as_str()))
                .filter_map(|(label, answer)| {
                    printable(answer).map(|text| ReportLine::Answer {
                        question: label.trim().to_string(),
                        answer: text,
                    })
                }),
        );
        lines.push(ReportLine::Spacer);
    }

    ReportRequest {
        patient_name: record.full_name().to_string(),
        as_of: display_date(as_of),
        summary: DEFAULT_SUMMARY.to_string(),
        lines,
    }
}

fn printable(answer: &Answer) -> Option<String> {
    let text = answer.to_string();
    let text = text.trim();
    (!text.is_empty() && text != "0").then(|| text.to_string())
}
