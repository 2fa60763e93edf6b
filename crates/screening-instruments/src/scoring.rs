use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use screening_core::models::answer::{Answer, AnswerSet};
use screening_core::models::patient::{Severity, Verdict};

/// Declarative column selection: a header belongs to an instrument when it
/// contains the tag and none of the excluded fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub tag: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ColumnRule {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            exclude: Vec::new(),
        }
    }

    pub fn includes(&self, label: &str) -> bool {
        label.contains(&self.tag) && !self.exclude.iter().any(|x| label.contains(x.as_str()))
    }

    /// Headers from `labels` this rule includes, in input order.
    pub fn select<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        labels.into_iter().filter(|l| self.includes(l)).collect()
    }
}

/// Literal answer text → points. Unmapped answers score 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(pub BTreeMap<String, u32>);

impl PointsTable {
    pub fn from_pairs(pairs: &[(&str, u32)]) -> Self {
        Self(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    pub fn points(&self, answer: &Answer) -> u32 {
        self.0.get(&answer.to_string()).copied().unwrap_or(0)
    }
}

/// One verdict threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictBand {
    pub min: u32,
    pub label: String,
    pub severity: Severity,
}

/// Ordered verdict thresholds, most severe first. The first band whose
/// minimum is met wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerdictScale(pub Vec<VerdictBand>);

impl VerdictScale {
    pub fn from_bands(bands: &[(u32, &str, Severity)]) -> Self {
        Self(
            bands
                .iter()
                .map(|(min, label, severity)| VerdictBand {
                    min: *min,
                    label: label.to_string(),
                    severity: *severity,
                })
                .collect(),
        )
    }

    pub fn verdict(&self, score: u32) -> Verdict {
        self.0
            .iter()
            .find(|band| score >= band.min)
            .map(|band| Verdict::new(band.label.clone(), band.severity))
            .unwrap_or_else(|| Verdict::new("unclassified", Severity::Unknown))
    }
}

/// A numeric band covering `(previous up_to, up_to]`; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub up_to: Option<f64>,
    pub points: u32,
}

/// Ascending half-open numeric bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericBands(pub Vec<Band>);

impl NumericBands {
    /// `bounds` are the inclusive upper edges; `points` has one more entry
    /// than `bounds` for the unbounded tail.
    pub fn new(bounds: &[f64], points: &[u32]) -> Self {
        let mut bands: Vec<Band> = bounds
            .iter()
            .zip(points)
            .map(|(up_to, points)| Band {
                up_to: Some(*up_to),
                points: *points,
            })
            .collect();
        if let Some(tail) = points.get(bounds.len()) {
            bands.push(Band {
                up_to: None,
                points: *tail,
            });
        }
        Self(bands)
    }

    pub fn points(&self, value: f64) -> u32 {
        self.0
            .iter()
            .find(|band| band.up_to.is_none_or(|up_to| value <= up_to))
            .map(|band| band.points)
            .unwrap_or(0)
    }
}

/// Numeric reading of an answer; missing or non-numeric answers read as 0.
pub fn numeric_or_zero(answer: Option<&Answer>) -> f64 {
    answer.and_then(Answer::to_number).unwrap_or(0.0)
}

/// First answer whose label contains `fragment`.
pub fn answer_by_fragment<'a>(answers: &'a AnswerSet, fragment: &str) -> Option<&'a Answer> {
    screening_core::models::answer::find_by_fragment(answers, fragment).map(|(_, a)| a)
}

/// Sum of point-table lookups over every answer the rule includes.
pub fn bag_score(answers: &AnswerSet, columns: &ColumnRule, points: &PointsTable) -> u32 {
    answers
        .iter()
        .filter(|(label, _)| columns.includes(label))
        .map(|(_, answer)| points.points(answer))
        .sum()
}

/// Column rule, points table and verdict scale of a plain summed instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagRule {
    pub columns: ColumnRule,
    pub points: PointsTable,
    pub scale: VerdictScale,
}
