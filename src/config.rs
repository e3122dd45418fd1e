use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Location and file names of the model artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_artifact_dir")]
    pub dir: String,
    #[serde(default = "default_classifier_file")]
    pub classifier: String,
    #[serde(default = "default_preprocessor_file")]
    pub preprocessor: String,
    #[serde(default = "default_label_encoder_file")]
    pub label_encoder: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            classifier: default_classifier_file(),
            preprocessor: default_preprocessor_file(),
            label_encoder: default_label_encoder_file(),
        }
    }
}

fn default_artifact_dir() -> String { "artifacts".to_string() }
fn default_classifier_file() -> String { "my_cardio_model.json".to_string() }
fn default_preprocessor_file() -> String { "my_data_preprocessor.json".to_string() }
fn default_label_encoder_file() -> String { "my_label_encoder.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CARDIO_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CARDIO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CARDIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CARDIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables that do not follow the CARDIO__ scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(dir) = env::var("ARTIFACTS_DIR") {
        builder = builder.set_override("artifacts.dir", dir)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_artifacts() {
        let artifacts = ArtifactSettings::default();
        assert_eq!(artifacts.dir, "artifacts");
        assert_eq!(artifacts.classifier, "my_cardio_model.json");
        assert_eq!(artifacts.preprocessor, "my_data_preprocessor.json");
        assert_eq!(artifacts.label_encoder, "my_label_encoder.json");
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.artifacts.dir, "artifacts");
        assert!(settings.server.workers.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = format!("{}/config/default.toml", env!("CARGO_MANIFEST_DIR"));
        let settings = Settings::load_from(path).unwrap();
        assert_eq!(settings.artifacts.classifier, "my_cardio_model.json");
    }
}
