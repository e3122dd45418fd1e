use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PredictionError;
use crate::models::PatientRecord;

/// Fitted feature transform applied before the classifier
pub trait Preprocessor: Send + Sync {
    /// Turn a record into the feature vector the classifier consumes
    fn transform(&self, record: &PatientRecord) -> Result<Vec<f64>, PredictionError>;

    /// Number of features `transform` produces
    fn output_width(&self) -> usize;

    /// Column names the transform was fitted on, in order
    fn input_features(&self) -> Vec<String> {
        PatientRecord::FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }
}

/// What to do with a one-hot value that was not seen during fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

/// Treatment of columns no transformer selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remainder {
    #[default]
    Drop,
    Passthrough,
}

/// One fitted step of a column transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<f64>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
    Drop {
        columns: Vec<String>,
    },
}

impl ColumnStep {
    pub fn columns(&self) -> &[String] {
        match self {
            Self::StandardScaler { columns, .. }
            | Self::OneHot { columns, .. }
            | Self::Passthrough { columns }
            | Self::Drop { columns } => columns,
        }
    }

    fn output_width(&self) -> usize {
        match self {
            Self::StandardScaler { columns, .. } | Self::Passthrough { columns } => columns.len(),
            Self::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
            Self::Drop { .. } => 0,
        }
    }

    fn apply(&self, record: &PatientRecord, out: &mut Vec<f64>) -> Result<(), PredictionError> {
        match self {
            Self::StandardScaler { columns, mean, scale } => {
                for (column, (mean, scale)) in columns.iter().zip(mean.iter().zip(scale)) {
                    out.push((column_value(record, column)? - mean) / scale);
                }
            }
            Self::OneHot { columns, categories, handle_unknown } => {
                for (column, categories) in columns.iter().zip(categories) {
                    let value = column_value(record, column)?;
                    match categories.iter().position(|c| *c == value) {
                        Some(hot) => {
                            out.extend((0..categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
                        }
                        None if *handle_unknown == HandleUnknown::Ignore => {
                            out.extend(std::iter::repeat(0.0).take(categories.len()));
                        }
                        None => {
                            return Err(PredictionError::mismatch(format!(
                                "found unknown category {} in column {}",
                                value, column
                            )));
                        }
                    }
                }
            }
            Self::Passthrough { columns } => {
                for column in columns {
                    out.push(column_value(record, column)?);
                }
            }
            Self::Drop { .. } => {}
        }
        Ok(())
    }
}

fn column_value(record: &PatientRecord, column: &str) -> Result<f64, PredictionError> {
    record
        .get(column)
        .ok_or_else(|| PredictionError::mismatch(format!("column {} is not part of the record", column)))
}

/// Column transformer fitted on the eleven record columns
///
/// Steps run in listed order and their outputs are concatenated; remainder
/// columns, when passed through, come last in fitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub feature_names_in: Vec<String>,
    pub transformers: Vec<ColumnStep>,
    #[serde(default)]
    pub remainder: Remainder,
}

impl ColumnTransformer {
    /// Structural checks run once when the artifact is loaded
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names_in.is_empty() {
            return Err("feature_names_in is empty".to_string());
        }

        let known: HashSet<&str> = self.feature_names_in.iter().map(String::as_str).collect();

        for (i, step) in self.transformers.iter().enumerate() {
            for column in step.columns() {
                if !known.contains(column.as_str()) {
                    return Err(format!("transformer {} selects unknown column {}", i, column));
                }
            }

            match step {
                ColumnStep::StandardScaler { columns, mean, scale } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(format!(
                            "transformer {}: {} columns but {} means and {} scales",
                            i,
                            columns.len(),
                            mean.len(),
                            scale.len()
                        ));
                    }
                    if mean.iter().any(|m| !m.is_finite()) {
                        return Err(format!("transformer {}: non-finite mean", i));
                    }
                    if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
                        return Err(format!("transformer {}: scale must be positive", i));
                    }
                }
                ColumnStep::OneHot { columns, categories, .. } => {
                    if categories.len() != columns.len() {
                        return Err(format!(
                            "transformer {}: {} columns but {} category lists",
                            i,
                            columns.len(),
                            categories.len()
                        ));
                    }
                    if categories.iter().any(Vec::is_empty) {
                        return Err(format!("transformer {}: empty category list", i));
                    }
                }
                ColumnStep::Passthrough { .. } | ColumnStep::Drop { .. } => {}
            }
        }

        Ok(())
    }

    fn remainder_columns(&self) -> impl Iterator<Item = &String> {
        let selected: HashSet<&str> = self
            .transformers
            .iter()
            .flat_map(|step| step.columns().iter().map(String::as_str))
            .collect();

        let keep = self.remainder == Remainder::Passthrough;
        self.feature_names_in
            .iter()
            .filter(move |name| keep && !selected.contains(name.as_str()))
    }
}

impl Preprocessor for ColumnTransformer {
    fn transform(&self, record: &PatientRecord) -> Result<Vec<f64>, PredictionError> {
        let fitted = self.feature_names_in.iter().map(String::as_str);
        if !fitted.eq(PatientRecord::FEATURE_NAMES.iter().copied()) {
            return Err(PredictionError::mismatch(format!(
                "preprocessor was fitted on {:?}, record provides {:?}",
                self.feature_names_in,
                PatientRecord::FEATURE_NAMES
            )));
        }

        let mut out = Vec::with_capacity(self.output_width());
        for step in &self.transformers {
            step.apply(record, &mut out)?;
        }
        for column in self.remainder_columns() {
            out.push(column_value(record, column)?);
        }

        Ok(out)
    }

    fn output_width(&self) -> usize {
        self.transformers.iter().map(ColumnStep::output_width).sum::<usize>()
            + self.remainder_columns().count()
    }

    fn input_features(&self) -> Vec<String> {
        self.feature_names_in.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        PatientRecord::FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn cols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn record() -> PatientRecord {
        PatientRecord {
            height: 175.0,
            weight: 85.0,
            ap_hi: 140.0,
            ap_lo: 90.0,
            age_year: 60.0,
            gender: 1.0,
            cholesterol: 3.0,
            gluc: 2.0,
            smoke: 1.0,
            alco: 0.0,
            active: 1.0,
        }
    }

    fn transformer() -> ColumnTransformer {
        ColumnTransformer {
            feature_names_in: names(),
            transformers: vec![
                ColumnStep::StandardScaler {
                    columns: cols(&["height", "ap_hi"]),
                    mean: vec![165.0, 120.0],
                    scale: vec![10.0, 20.0],
                },
                ColumnStep::OneHot {
                    columns: cols(&["cholesterol"]),
                    categories: vec![vec![1.0, 2.0, 3.0]],
                    handle_unknown: HandleUnknown::Error,
                },
                ColumnStep::Passthrough {
                    columns: cols(&["smoke"]),
                },
            ],
            remainder: Remainder::Drop,
        }
    }

    #[test]
    fn test_scale_one_hot_passthrough() {
        let t = transformer();
        assert!(t.validate().is_ok());

        let out = t.transform(&record()).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(t.output_width(), out.len());
    }

    #[test]
    fn test_input_features_are_fitted_names() {
        let mut t = transformer();
        t.feature_names_in.swap(0, 1);
        assert_eq!(t.input_features()[0], "weight");
        assert_eq!(t.input_features()[1], "height");
    }

    #[test]
    fn test_remainder_passthrough_keeps_fitted_order() {
        let mut t = transformer();
        t.remainder = Remainder::Passthrough;
        t.transformers.push(ColumnStep::Drop {
            columns: cols(&["gender", "gluc", "alco"]),
        });

        let out = t.transform(&record()).unwrap();
        // weight, ap_lo, age_year, active are left over
        assert_eq!(&out[6..], &[85.0, 90.0, 60.0, 1.0]);
        assert_eq!(t.output_width(), 10);
    }

    #[test]
    fn test_unknown_category_error() {
        let mut r = record();
        r.cholesterol = 4.0;
        let err = transformer().transform(&r).unwrap_err();
        assert!(matches!(err, PredictionError::PipelineMismatch(_)));
    }

    #[test]
    fn test_unknown_category_ignored() {
        let mut t = transformer();
        if let ColumnStep::OneHot { handle_unknown, .. } = &mut t.transformers[1] {
            *handle_unknown = HandleUnknown::Ignore;
        }
        let mut r = record();
        r.cholesterol = 4.0;

        let out = t.transform(&r).unwrap();
        assert_eq!(&out[2..5], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fitted_column_order_mismatch() {
        let mut t = transformer();
        t.feature_names_in.swap(0, 1);
        let err = t.transform(&record()).unwrap_err();
        assert!(matches!(err, PredictionError::PipelineMismatch(_)));
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let mut t = transformer();
        if let ColumnStep::StandardScaler { scale, .. } = &mut t.transformers[0] {
            scale[1] = 0.0;
        }
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_column() {
        let mut t = transformer();
        t.transformers.push(ColumnStep::Passthrough {
            columns: cols(&["bmi"]),
        });
        assert!(t.validate().unwrap_err().contains("bmi"));
    }

    #[test]
    fn test_deserialize_tagged_steps() {
        let json = r#"{
            "feature_names_in": ["height","weight","ap_hi","ap_lo","age_year","gender","cholesterol","gluc","smoke","alco","active"],
            "transformers": [
                {"kind": "one_hot", "columns": ["gender"], "categories": [[1, 2]]},
                {"kind": "passthrough", "columns": ["active"]}
            ],
            "remainder": "drop"
        }"#;
        let t: ColumnTransformer = serde_json::from_str(json).unwrap();
        assert!(t.validate().is_ok());
        assert_eq!(t.output_width(), 3);
        assert_eq!(t.transform(&record()).unwrap(), vec![1.0, 0.0, 1.0]);
    }
}
