// Core prediction exports
pub mod classifier;
pub mod encoder;
pub mod mapper;
pub mod pipeline;
pub mod preprocessor;
pub mod renderer;

pub use classifier::{Classifier, DenseNetwork, DenseLayer, Activation};
pub use encoder::{LabelEncoder, ClassLabelEncoder};
pub use mapper::{map_input, Gender, Level, YesNo};
pub use pipeline::{predict, classify, ModelArtifacts, DECISION_THRESHOLD};
pub use preprocessor::{Preprocessor, ColumnTransformer, ColumnStep, HandleUnknown, Remainder};
pub use renderer::{render, risk_level, format_percent};
