// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{PatientRecord, ClassLabel, PredictionResult, RiskLevel, RiskAssessment};
pub use requests::PredictRequest;
pub use responses::{PredictResponse, HealthResponse, ModelInfo, FormSchemaResponse, FormField, ErrorResponse};
