//! Cardio Risk - Cardiovascular risk prediction service
//!
//! This library maps patient form input to the numeric record a pre-trained
//! model expects, runs the fitted preprocessor and classifier, and renders the
//! thresholded result as a risk label with its probability.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{map_input, predict, render, ModelArtifacts};
pub use error::PredictionError;
pub use models::{PatientRecord, PredictionResult, PredictRequest, PredictResponse, RiskLevel};
pub use services::ResourceLoader;
