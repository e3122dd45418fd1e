use serde::{Deserialize, Serialize};
use std::fmt;

/// Eleven-field numeric record fed to the preprocessor
///
/// Field order follows the columns the preprocessor was fitted on and must not
/// change independently of the artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub height: f64,
    pub weight: f64,
    pub ap_hi: f64,
    pub ap_lo: f64,
    pub age_year: f64,
    pub gender: f64,
    pub cholesterol: f64,
    pub gluc: f64,
    pub smoke: f64,
    pub alco: f64,
    pub active: f64,
}

impl PatientRecord {
    /// Column names in fitted order
    pub const FEATURE_NAMES: [&'static str; 11] = [
        "height",
        "weight",
        "ap_hi",
        "ap_lo",
        "age_year",
        "gender",
        "cholesterol",
        "gluc",
        "smoke",
        "alco",
        "active",
    ];

    /// Values in the same order as `FEATURE_NAMES`
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.height,
            self.weight,
            self.ap_hi,
            self.ap_lo,
            self.age_year,
            self.gender,
            self.cholesterol,
            self.gluc,
            self.smoke,
            self.alco,
            self.active,
        ]
    }

    /// Look up a column by name
    pub fn get(&self, column: &str) -> Option<f64> {
        let value = match column {
            "height" => self.height,
            "weight" => self.weight,
            "ap_hi" => self.ap_hi,
            "ap_lo" => self.ap_lo,
            "age_year" => self.age_year,
            "gender" => self.gender,
            "cholesterol" => self.cholesterol,
            "gluc" => self.gluc,
            "smoke" => self.smoke,
            "alco" => self.alco,
            "active" => self.active,
            _ => return None,
        };
        Some(value)
    }
}

/// Class label as stored by the label encoder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Integer(i64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Output of the inference pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of the positive class, in [0, 1]
    pub probability: f64,
    /// Thresholded class before decoding (0 or 1)
    pub class_code: usize,
    /// Domain label returned by the label encoder
    pub label: ClassLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Low,
}

/// Human-readable decision derived from a `PredictionResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// "Tinggi" or "Rendah"
    pub level_text: String,
    pub headline: String,
    pub message: String,
    /// Probability as a percentage with two decimals, e.g. "37.75%"
    pub probability_percent: String,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PatientRecord {
        PatientRecord {
            height: 165.0,
            weight: 70.0,
            ap_hi: 120.0,
            ap_lo: 80.0,
            age_year: 55.0,
            gender: 2.0,
            cholesterol: 1.0,
            gluc: 1.0,
            smoke: 0.0,
            alco: 0.0,
            active: 1.0,
        }
    }

    #[test]
    fn test_get_matches_vec_order() {
        let record = sample_record();
        let values = record.to_vec();

        for (i, name) in PatientRecord::FEATURE_NAMES.iter().enumerate() {
            assert_eq!(record.get(name), Some(values[i]), "column {}", name);
        }
        assert_eq!(record.get("bmi"), None);
    }

    #[test]
    fn test_class_label_untagged() {
        let labels: Vec<ClassLabel> = serde_json::from_str(r#"[0, 1, "present"]"#).unwrap();
        assert_eq!(labels[0], ClassLabel::Integer(0));
        assert_eq!(labels[1], ClassLabel::Integer(1));
        assert_eq!(labels[2], ClassLabel::Text("present".to_string()));
        assert_eq!(labels[2].to_string(), "present");
    }
}
