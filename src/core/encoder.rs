use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PredictionError;
use crate::models::ClassLabel;

/// Maps classifier class codes back to the labels used in training
pub trait LabelEncoder: Send + Sync {
    fn inverse_transform(&self, code: usize) -> Result<ClassLabel, PredictionError>;

    fn classes(&self) -> &[ClassLabel];
}

/// Fitted label encoder: code `i` decodes to `classes[i]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassLabelEncoder {
    pub classes: Vec<ClassLabel>,
}

impl ClassLabelEncoder {
    pub fn new(classes: Vec<ClassLabel>) -> Self {
        Self { classes }
    }

    /// The decision step only emits 0 and 1, so exactly two distinct classes are required
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() != 2 {
            return Err(format!("expected 2 classes, found {}", self.classes.len()));
        }
        let distinct: HashSet<&ClassLabel> = self.classes.iter().collect();
        if distinct.len() != self.classes.len() {
            return Err("classes must be distinct".to_string());
        }
        Ok(())
    }
}

impl LabelEncoder for ClassLabelEncoder {
    fn inverse_transform(&self, code: usize) -> Result<ClassLabel, PredictionError> {
        self.classes.get(code).cloned().ok_or_else(|| {
            PredictionError::mismatch(format!("label encoder has no class for code {}", code))
        })
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }
}
