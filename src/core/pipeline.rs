use std::fmt;

use crate::core::{classifier::Classifier, encoder::LabelEncoder, preprocessor::Preprocessor};
use crate::error::PredictionError;
use crate::models::{ModelInfo, PatientRecord, PredictionResult};

/// Probabilities strictly above this value are the positive class
pub const DECISION_THRESHOLD: f64 = 0.5;

/// The loaded classifier, preprocessor and label encoder
///
/// Built once and shared read-only by every request.
pub struct ModelArtifacts {
    classifier: Box<dyn Classifier>,
    preprocessor: Box<dyn Preprocessor>,
    label_encoder: Box<dyn LabelEncoder>,
}

impl ModelArtifacts {
    pub fn new(
        classifier: Box<dyn Classifier>,
        preprocessor: Box<dyn Preprocessor>,
        label_encoder: Box<dyn LabelEncoder>,
    ) -> Self {
        Self {
            classifier,
            preprocessor,
            label_encoder,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn preprocessor(&self) -> &dyn Preprocessor {
        self.preprocessor.as_ref()
    }

    pub fn label_encoder(&self) -> &dyn LabelEncoder {
        self.label_encoder.as_ref()
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            input_features: self.preprocessor.input_features(),
            feature_width: self.preprocessor.output_width(),
            layers: self.classifier.depth(),
            classes: self.label_encoder.classes().to_vec(),
        }
    }
}

impl fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("feature_width", &self.preprocessor.output_width())
            .field("input_width", &self.classifier.input_width())
            .field("layers", &self.classifier.depth())
            .field("classes", &self.label_encoder.classes())
            .finish()
    }
}

/// Threshold a probability into a class code
#[inline]
pub fn classify(probability: f64) -> usize {
    if probability > DECISION_THRESHOLD { 1 } else { 0 }
}

/// Run one record through transform, predict, threshold and decode
pub fn predict(
    record: &PatientRecord,
    artifacts: &ModelArtifacts,
) -> Result<PredictionResult, PredictionError> {
    let features = artifacts.preprocessor.transform(record)?;
    let probability = artifacts.classifier.predict(&features)?;
    let class_code = classify(probability);
    let label = artifacts.label_encoder.inverse_transform(class_code)?;

    tracing::debug!(
        "Prediction: probability={:.4}, class={}, label={}",
        probability,
        class_code,
        label
    );

    Ok(PredictionResult {
        probability,
        class_code,
        label,
    })
}
