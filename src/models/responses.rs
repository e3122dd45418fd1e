use serde::{Deserialize, Serialize};
use crate::models::domain::{ClassLabel, PatientRecord, RiskLevel};

/// Response for the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction_id: String,
    pub record: PatientRecord,
    pub probability: f64,
    pub label: ClassLabel,
    pub risk_level: RiskLevel,
    pub headline: String,
    pub message: String,
    pub probability_percent: String,
    pub summary: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub model: ModelInfo,
}

/// Shape of the loaded artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Fitted column order reported by the preprocessor
    pub input_features: Vec<String>,
    pub feature_width: usize,
    pub layers: usize,
    pub classes: Vec<ClassLabel>,
}

/// Form schema: every input with its bounds or options and its starting value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchemaResponse {
    pub title: String,
    pub description: String,
    pub submit_label: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormField {
    Number {
        name: String,
        label: String,
        min: f64,
        max: Option<f64>,
        default: f64,
    },
    Select {
        name: String,
        label: String,
        options: Vec<String>,
        default: String,
    },
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
