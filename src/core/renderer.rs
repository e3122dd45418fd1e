use crate::models::{ClassLabel, PredictionResult, RiskAssessment, RiskLevel};

const HIGH_RISK_MESSAGE: &str =
    "Pasien ini diprediksi memiliki risiko tinggi terkena penyakit kardiovaskular.";
const LOW_RISK_MESSAGE: &str =
    "Pasien ini diprediksi memiliki risiko rendah terkena penyakit kardiovaskular.";

/// Only the integer label 1 means high risk; any other label is low risk
pub fn risk_level(label: &ClassLabel) -> RiskLevel {
    match label {
        ClassLabel::Integer(1) => RiskLevel::High,
        _ => RiskLevel::Low,
    }
}

/// Probability as a percentage with two decimals
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Build the text shown to the user for a prediction
pub fn render(result: &PredictionResult) -> RiskAssessment {
    let level = risk_level(&result.label);
    let (level_text, message) = match level {
        RiskLevel::High => ("Tinggi", HIGH_RISK_MESSAGE),
        RiskLevel::Low => ("Rendah", LOW_RISK_MESSAGE),
    };
    let probability_percent = format_percent(result.probability);

    RiskAssessment {
        level,
        level_text: level_text.to_string(),
        headline: format!("Risiko {}", level_text),
        message: message.to_string(),
        summary: format!("Probabilitas risiko: {}", probability_percent),
        probability_percent,
    }
}
