use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{map_input, predict as run_pipeline, render, Gender, Level, ModelArtifacts, YesNo};
use crate::error::PredictionError;
use crate::models::{ErrorResponse, FormField, FormSchemaResponse, HealthResponse, PredictRequest, PredictResponse};
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Built once at startup after the artifacts are loaded and never reassigned.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ModelArtifacts>,
}

impl AppState {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }
}

/// Configure all prediction-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/form", web::get().to(form_schema))
        .route("/predict", web::post().to(predict));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        model: state.artifacts.info(),
    })
}

/// Form schema endpoint
///
/// GET /api/v1/form
///
/// Lists every input with its bounds or options and the value the form starts with.
async fn form_schema() -> impl Responder {
    HttpResponse::Ok().json(form_definition())
}

pub fn form_definition() -> FormSchemaResponse {
    let defaults = PredictRequest::default();

    let number = |name: &str, label: &str, min: f64, max: Option<f64>, default: f64| FormField::Number {
        name: name.to_string(),
        label: label.to_string(),
        min,
        max,
        default,
    };
    let select = |name: &str, label: &str, options: &[&str], default: &str| FormField::Select {
        name: name.to_string(),
        label: label.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        default: default.to_string(),
    };

    FormSchemaResponse {
        title: "Aplikasi Prediksi Risiko Kardiovaskular".to_string(),
        description: "Masukkan data pasien di bawah ini untuk memprediksi risiko penyakit kardiovaskular."
            .to_string(),
        submit_label: "Prediksi".to_string(),
        fields: vec![
            number("age", "Usia (tahun)", 1.0, Some(120.0), defaults.age),
            select("gender", "Jenis Kelamin", &Gender::OPTIONS[..], defaults.gender.as_str()),
            number("ap_hi", "TD.Sistolik(hi)", 1.0, None, defaults.ap_hi),
            select("smoke", "Kebiasaan Merokok", &YesNo::OPTIONS[..], defaults.smoke.as_str()),
            select("active", "Aktivitas Fisik", &YesNo::OPTIONS[..], defaults.active.as_str()),
            select("cholesterol", "Tingkat Kolesterol", &Level::OPTIONS[..], defaults.cholesterol.as_str()),
            number("height", "Tinggi Badan(cm)", 1.0, Some(300.0), defaults.height),
            number("weight", "Berat Badan (kg)", 1.0, Some(300.0), defaults.weight),
            number("ap_lo", "TD.Diastolik(lo)", 1.0, None, defaults.ap_lo),
            select("alco", "Mengonsumsi Alkohol", &YesNo::OPTIONS[..], defaults.alco.as_str()),
            select("gluc", "Tingkat Glukosa", &Level::OPTIONS[..], defaults.gluc.as_str()),
        ],
    }
}

/// Predict endpoint
///
/// POST /api/v1/predict
///
/// Request body:
/// ```json
/// {
///   "age": 55, "gender": "Pria", "height": 165, "weight": 70,
///   "ap_hi": 120, "ap_lo": 80, "cholesterol": "Normal", "gluc": "Normal",
///   "smoke": "Tidak", "alco": "Tidak", "active": "Ya"
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, PredictionError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for predict request: field_errors={:?}", errors);
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let record = map_input(&req).map_err(|e| {
        tracing::warn!("Rejected form selection: {}", e);
        e
    })?;

    let result = run_pipeline(&record, &state.artifacts).map_err(|e| {
        tracing::error!("Inference failed for {:?}: {}", record, e);
        e
    })?;

    let assessment = render(&result);

    let response = PredictResponse {
        prediction_id: uuid::Uuid::new_v4().to_string(),
        record,
        probability: result.probability,
        label: result.label,
        risk_level: assessment.level,
        headline: assessment.headline,
        message: assessment.message,
        probability_percent: assessment.probability_percent,
        summary: assessment.summary,
        created_at: chrono::Utc::now(),
    };

    tracing::info!(
        "Prediction {}: {} ({})",
        response.prediction_id,
        assessment.level_text,
        response.probability_percent
    );

    Ok(HttpResponse::Ok().json(response))
}
