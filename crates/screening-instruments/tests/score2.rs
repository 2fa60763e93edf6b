use screening_core::models::answer::{Answer, AnswerSet};
use screening_core::models::patient::{InstrumentId, Severity};
use screening_instruments::config::{ScoringConfig, Sex};
use screening_instruments::instruments::score2::{Score2Inputs, Score2Tier, classify};
use screening_instruments::{ScoringContext, build_instrument};

use Score2Tier::{High, Low, Moderate};

fn inputs(sex: Sex, smoker: bool, sbp: f64, cholesterol: f64) -> Score2Inputs {
    Score2Inputs {
        sex,
        smoker,
        sbp,
        cholesterol,
    }
}

fn clinician_form(sex: &str, smoking: Option<&str>, sbp: f64, cholesterol: Option<f64>) -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.insert("Вкажіть стать".to_string(), Answer::Text(sex.to_string()));
    answers.insert(
        "[SCORE2] Систолічний артеріальний тиск (мм рт. ст.)".to_string(),
        Answer::Number(sbp),
    );
    if let Some(chol) = cholesterol {
        answers.insert(
            "[SCORE2] Рівень non-HDL холестерину (ммоль/л)".to_string(),
            Answer::Number(chol),
        );
    }
    if let Some(smoking) = smoking {
        answers.insert(
            "[SCORE2] Куріння тютюнових виробів".to_string(),
            Answer::Text(smoking.to_string()),
        );
    }
    answers
}

#[test]
fn missing_age_wins_over_missing_cholesterol() {
    let i = inputs(Sex::Female, false, 110.0, 0.0);
    assert_eq!(classify(&i, None), Score2Tier::InsufficientData);
    assert_eq!(classify(&i, Some(0)), Score2Tier::InsufficientData);
}

#[test]
fn missing_cholesterol_asks_for_it() {
    let i = inputs(Sex::Male, true, 200.0, 0.0);
    assert_eq!(classify(&i, Some(60)), Score2Tier::EnterCholesterol);
}

#[test]
fn low_risk_cells_are_female_non_smokers_only() {
    assert_eq!(classify(&inputs(Sex::Female, false, 110.0, 4.0), Some(40)), Score2Tier::Low);
    assert_eq!(classify(&inputs(Sex::Female, false, 115.0, 2.5), Some(52)), Score2Tier::Low);

    assert_ne!(classify(&inputs(Sex::Female, true, 110.0, 4.0), Some(40)), Score2Tier::Low);
    assert_ne!(classify(&inputs(Sex::Male, false, 110.0, 4.0), Some(40)), Score2Tier::Low);
}

#[test]
fn moderate_and_high_cells() {
    assert_eq!(classify(&inputs(Sex::Female, false, 150.0, 5.0), Some(52)), Score2Tier::Moderate);
    assert_eq!(classify(&inputs(Sex::Female, false, 165.0, 5.0), Some(52)), Score2Tier::High);
    assert_eq!(classify(&inputs(Sex::Male, false, 130.0, 5.0), Some(60)), Score2Tier::Moderate);
    assert_eq!(classify(&inputs(Sex::Male, true, 130.0, 3.0), Some(60)), Score2Tier::High);
    assert_eq!(classify(&inputs(Sex::Male, true, 115.0, 3.5), Some(60)), Score2Tier::Moderate);
}

#[test]
fn extreme_readings_are_always_high() {
    assert_eq!(classify(&inputs(Sex::Female, false, 180.0, 4.0), Some(48)), Score2Tier::High);
    assert_eq!(classify(&inputs(Sex::Female, false, 130.0, 8.0), Some(48)), Score2Tier::High);
}

#[test]
fn age_ninety_and_over_is_high() {
    assert_eq!(classify(&inputs(Sex::Female, false, 110.0, 2.0), Some(90)), Score2Tier::High);
}

#[test]
fn unrecognized_sex_is_never_low_or_moderate() {
    assert_eq!(classify(&inputs(Sex::Other, false, 110.0, 2.0), Some(40)), Score2Tier::High);
}

#[test]
fn instrument_reads_the_clinician_form() {
    let config = ScoringConfig::default();
    let score2 = build_instrument(InstrumentId::Score2, &config);

    let outcome = score2.score(
        &clinician_form("жінка", Some("Ні"), 110.0, Some(4.0)),
        &ScoringContext { age: Some(40) },
    );
    assert_eq!(outcome.score, None);
    assert_eq!(outcome.verdict.label, "low risk");
    assert_eq!(outcome.verdict.severity, Severity::Low);

    let smoker = score2.score(
        &clinician_form("жінка", Some("Так"), 110.0, Some(4.0)),
        &ScoringContext { age: Some(40) },
    );
    assert_eq!(smoker.verdict.label, "moderate risk");
}

#[test]
fn missing_smoking_answer_counts_as_non_smoker() {
    let config = ScoringConfig::default();
    let score2 = build_instrument(InstrumentId::Score2, &config);

    let outcome = score2.score(
        &clinician_form("жінка", None, 110.0, Some(4.0)),
        &ScoringContext { age: Some(40) },
    );
    assert_eq!(outcome.verdict.label, "low risk");
}

#[test]
fn gate_verdicts_through_the_instrument() {
    let config = ScoringConfig::default();
    let score2 = build_instrument(InstrumentId::Score2, &config);

    let no_age = score2.score(
        &clinician_form("чоловік", Some("Так"), 140.0, None),
        &ScoringContext { age: None },
    );
    assert_eq!(no_age.verdict.label, "insufficient data");
    assert_eq!(no_age.verdict.severity, Severity::Unknown);

    let no_chol = score2.score(
        &clinician_form("чоловік", Some("Так"), 140.0, None),
        &ScoringContext { age: Some(55) },
    );
    assert_eq!(no_chol.verdict.label, "enter cholesterol");
}

/// One chart cell checked just inside and just outside its moderate region:
/// (sex, smoker, age, sbp, cholesterol, expected).
const CHART: &[(Sex, bool, u32, f64, f64, Score2Tier)] = &[
    // Female non-smoker
    (Sex::Female, false, 47, 170.0, 7.5, Moderate),
    (Sex::Female, false, 47, 180.0, 5.0, High),
    (Sex::Female, false, 50, 150.0, 5.9, Moderate),
    (Sex::Female, false, 54, 140.0, 6.0, High),
    (Sex::Female, false, 55, 150.0, 4.9, Moderate),
    (Sex::Female, false, 59, 140.0, 5.0, High),
    (Sex::Female, false, 60, 139.0, 5.9, Moderate),
    (Sex::Female, false, 69, 120.0, 6.0, High),
    (Sex::Female, false, 70, 159.0, 6.9, Moderate),
    (Sex::Female, false, 89, 160.0, 4.0, High),
    // Female smoker
    (Sex::Female, true, 49, 159.0, 5.9, Moderate),
    (Sex::Female, true, 40, 140.0, 6.0, High),
    (Sex::Female, true, 50, 139.0, 7.0, Moderate),
    (Sex::Female, true, 54, 145.0, 5.0, High),
    (Sex::Female, true, 55, 119.0, 7.0, Moderate),
    (Sex::Female, true, 69, 120.0, 5.0, High),
    (Sex::Female, true, 70, 139.0, 5.9, Moderate),
    (Sex::Female, true, 89, 140.0, 4.0, High),
    // Male non-smoker
    (Sex::Male, false, 45, 150.0, 5.9, Moderate),
    (Sex::Male, false, 49, 160.0, 4.0, High),
    (Sex::Male, false, 50, 150.0, 4.9, Moderate),
    (Sex::Male, false, 54, 140.0, 5.0, High),
    (Sex::Male, false, 55, 139.0, 5.9, Moderate),
    (Sex::Male, false, 69, 125.0, 6.0, High),
    (Sex::Male, false, 70, 100.0, 5.0, Moderate),
    (Sex::Male, false, 89, 140.0, 3.0, High),
    // Male smoker
    (Sex::Male, true, 49, 140.0, 4.9, Moderate),
    (Sex::Male, true, 30, 140.0, 5.0, High),
    (Sex::Male, true, 50, 139.0, 5.9, Moderate),
    (Sex::Male, true, 54, 130.0, 6.0, High),
    (Sex::Male, true, 55, 119.0, 3.9, Moderate),
    (Sex::Male, true, 69, 119.0, 4.0, High),
    (Sex::Male, true, 70, 119.0, 4.9, Moderate),
    (Sex::Male, true, 89, 120.0, 3.0, High),
    // 90 and over
    (Sex::Male, true, 90, 100.0, 2.0, High),
    (Sex::Female, false, 95, 100.0, 2.0, High),
];

#[test]
fn every_chart_cell_inside_and_outside() {
    for &(sex, smoker, age, sbp, chol, expected) in CHART {
        assert_eq!(
            classify(&inputs(sex, smoker, sbp, chol), Some(age)),
            expected,
            "{sex:?} smoker={smoker} age={age} sbp={sbp} chol={chol}"
        );
    }
}

#[test]
fn low_bands_leave_a_gap_at_45_to_49() {
    let calm = inputs(Sex::Female, false, 110.0, 2.5);
    assert_eq!(classify(&calm, Some(44)), Low);
    assert_eq!(classify(&calm, Some(45)), Moderate);
    assert_eq!(classify(&calm, Some(49)), Moderate);
    assert_eq!(classify(&calm, Some(50)), Low);
    assert_eq!(classify(&calm, Some(54)), Low);
    assert_eq!(classify(&calm, Some(55)), Moderate);

    assert_eq!(classify(&inputs(Sex::Female, false, 119.0, 3.0), Some(50)), Low);
    assert_eq!(classify(&inputs(Sex::Female, false, 119.0, 3.1), Some(50)), Moderate);
    assert_eq!(classify(&inputs(Sex::Female, false, 120.0, 5.0), Some(40)), Moderate);
    assert_eq!(classify(&inputs(Sex::Female, false, 119.0, 5.1), Some(40)), Moderate);
}

#[test]
fn bracket_edges() {
    // 49 | 50
    let f = inputs(Sex::Female, false, 165.0, 5.0);
    assert_eq!(classify(&f, Some(49)), Moderate);
    assert_eq!(classify(&f, Some(50)), High);
    // 54 | 55
    let m = inputs(Sex::Male, true, 119.0, 5.0);
    assert_eq!(classify(&m, Some(54)), Moderate);
    assert_eq!(classify(&m, Some(55)), High);
    // 59 | 60
    let f = inputs(Sex::Female, false, 130.0, 6.5);
    assert_eq!(classify(&f, Some(59)), Moderate);
    assert_eq!(classify(&f, Some(60)), High);
    // 69 | 70
    let f = inputs(Sex::Female, false, 150.0, 5.0);
    assert_eq!(classify(&f, Some(69)), High);
    assert_eq!(classify(&f, Some(70)), Moderate);
    // 89 | 90
    let f = inputs(Sex::Female, false, 120.0, 5.0);
    assert_eq!(classify(&f, Some(89)), Moderate);
    assert_eq!(classify(&f, Some(90)), High);
}
