use serde::{Deserialize, Serialize};
use validator::Validate;

/// Form submission for a single prediction
///
/// Categorical fields carry the labels shown in the form; numeric bounds
/// mirror the form's input widgets.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(range(min = 1.0, max = 120.0))]
    #[serde(alias = "age_year")]
    pub age: f64,
    pub gender: String,
    #[validate(range(min = 1.0, max = 300.0))]
    pub height: f64,
    #[validate(range(min = 1.0, max = 300.0))]
    pub weight: f64,
    #[validate(range(min = 1.0))]
    pub ap_hi: f64,
    #[validate(range(min = 1.0))]
    pub ap_lo: f64,
    pub cholesterol: String,
    pub gluc: String,
    pub smoke: String,
    pub alco: String,
    pub active: String,
}

impl Default for PredictRequest {
    /// The values the form starts with
    fn default() -> Self {
        Self {
            age: 55.0,
            gender: "Pria".to_string(),
            height: 165.0,
            weight: 70.0,
            ap_hi: 120.0,
            ap_lo: 80.0,
            cholesterol: "Normal".to_string(),
            gluc: "Normal".to_string(),
            smoke: "Tidak".to_string(),
            alco: "Tidak".to_string(),
            active: "Ya".to_string(),
        }
    }
}
