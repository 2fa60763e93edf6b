use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One answer cell from a questionnaire row.
///
/// Empty cells are never represented: an unanswered question is simply absent
/// from the [`AnswerSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Answer {
    Number(f64),
    Text(String),
}

/// Question label → answer, in source column order.
pub type AnswerSet = IndexMap<String, Answer>;

impl Answer {
    /// Interpret a raw CSV cell. Blank cells yield `None`.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(Answer::Number(n)),
            _ => Some(Answer::Text(trimmed.to_string())),
        }
    }

    /// Numeric reading of the answer; text is parsed tolerantly
    /// (see [`parse_decimal`]).
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            Answer::Text(s) => parse_decimal(s),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            Answer::Number(_) => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Answer::Number(n) => write!(f, "{n}"),
            Answer::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a number written with either `.` or `,` as the decimal separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// First answer whose label contains `fragment`.
pub fn find_by_fragment<'a>(answers: &'a AnswerSet, fragment: &str) -> Option<(&'a str, &'a Answer)> {
    answers
        .iter()
        .find(|(label, _)| label.contains(fragment))
        .map(|(label, answer)| (label.as_str(), answer))
}
