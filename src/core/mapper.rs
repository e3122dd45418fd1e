use crate::error::PredictionError;
use crate::models::{PatientRecord, PredictRequest};

// Codes are pinned to the encoding the artifacts were trained with.
// Changing any of them silently corrupts predictions.

/// Gender selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Wanita,
    Pria,
}

impl Gender {
    pub const OPTIONS: [&'static str; 2] = ["Pria", "Wanita"];

    pub fn from_label(field: &'static str, label: &str) -> Result<Self, PredictionError> {
        match label {
            "Wanita" => Ok(Self::Wanita),
            "Pria" => Ok(Self::Pria),
            other => Err(unknown(field, other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Wanita => 1,
            Self::Pria => 2,
        }
    }
}

/// Cholesterol and glucose level selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Normal,
    AboveNormal,
    WellAboveNormal,
}

impl Level {
    pub const OPTIONS: [&'static str; 3] = ["Normal", "Di Atas Normal", "Sangat di Atas Normal"];

    pub fn from_label(field: &'static str, label: &str) -> Result<Self, PredictionError> {
        match label {
            "Normal" => Ok(Self::Normal),
            "Di Atas Normal" => Ok(Self::AboveNormal),
            "Sangat di Atas Normal" => Ok(Self::WellAboveNormal),
            other => Err(unknown(field, other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::AboveNormal => 2,
            Self::WellAboveNormal => 3,
        }
    }
}

/// Yes/no selection used by smoke, alco and active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Tidak,
    Ya,
}

impl YesNo {
    pub const OPTIONS: [&'static str; 2] = ["Tidak", "Ya"];

    pub fn from_label(field: &'static str, label: &str) -> Result<Self, PredictionError> {
        match label {
            "Tidak" => Ok(Self::Tidak),
            "Ya" => Ok(Self::Ya),
            other => Err(unknown(field, other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Tidak => 0,
            Self::Ya => 1,
        }
    }
}

fn unknown(field: &'static str, value: &str) -> PredictionError {
    PredictionError::UnknownCategory {
        field,
        value: value.to_string(),
    }
}

/// Map form selections to the numeric record the preprocessor expects
///
/// Numeric fields pass through unchanged; each categorical label is replaced
/// by its integer code.
pub fn map_input(req: &PredictRequest) -> Result<PatientRecord, PredictionError> {
    Ok(PatientRecord {
        height: req.height,
        weight: req.weight,
        ap_hi: req.ap_hi,
        ap_lo: req.ap_lo,
        age_year: req.age,
        gender: Gender::from_label("gender", &req.gender)?.code() as f64,
        cholesterol: Level::from_label("cholesterol", &req.cholesterol)?.code() as f64,
        gluc: Level::from_label("gluc", &req.gluc)?.code() as f64,
        smoke: YesNo::from_label("smoke", &req.smoke)?.code() as f64,
        alco: YesNo::from_label("alco", &req.alco)?.code() as f64,
        active: YesNo::from_label("active", &req.active)?.code() as f64,
    })
}
