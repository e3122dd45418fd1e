use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::config::ArtifactSettings;
use crate::core::{ClassLabelEncoder, Classifier, ColumnTransformer, DenseNetwork, ModelArtifacts, Preprocessor};
use crate::error::PredictionError;

/// Loads the three model artifacts once and hands out the cached copy
///
/// The first successful `load` stores the artifacts; every later call returns
/// the same `Arc` without touching the filesystem. Concurrent first calls
/// wait on `init` so the files are read once.
pub struct ResourceLoader {
    classifier_path: PathBuf,
    preprocessor_path: PathBuf,
    label_encoder_path: PathBuf,
    loaded: OnceLock<Arc<ModelArtifacts>>,
    init: Mutex<()>,
    #[cfg(test)]
    reads: std::sync::atomic::AtomicUsize,
}

impl ResourceLoader {
    pub fn new(settings: &ArtifactSettings) -> Self {
        let dir = Path::new(&settings.dir);
        Self {
            classifier_path: dir.join(&settings.classifier),
            preprocessor_path: dir.join(&settings.preprocessor),
            label_encoder_path: dir.join(&settings.label_encoder),
            loaded: OnceLock::new(),
            init: Mutex::new(()),
            #[cfg(test)]
            reads: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Loader for the default file names inside `dir`
    pub fn from_dir(dir: impl Into<String>) -> Self {
        Self::new(&ArtifactSettings {
            dir: dir.into(),
            ..Default::default()
        })
    }

    /// Return the cached artifacts, loading them on first use
    pub fn load(&self) -> Result<Arc<ModelArtifacts>, PredictionError> {
        if let Some(artifacts) = self.loaded.get() {
            return Ok(Arc::clone(artifacts));
        }

        // The guard protects no data, so a poisoned lock is still usable
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(artifacts) = self.loaded.get() {
            return Ok(Arc::clone(artifacts));
        }

        let artifacts = Arc::new(self.read_all()?);
        Ok(Arc::clone(self.loaded.get_or_init(|| artifacts)))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn read_all(&self) -> Result<ModelArtifacts, PredictionError> {
        #[cfg(test)]
        self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        // Report a missing file before parsing anything
        for path in [&self.classifier_path, &self.preprocessor_path, &self.label_encoder_path] {
            if !path.is_file() {
                return Err(PredictionError::ResourceNotFound { path: path.clone() });
            }
        }

        let classifier: DenseNetwork = read_json(&self.classifier_path)?;
        classifier
            .validate()
            .map_err(|reason| PredictionError::corrupt(&self.classifier_path, reason))?;

        let preprocessor: ColumnTransformer = read_json(&self.preprocessor_path)?;
        preprocessor
            .validate()
            .map_err(|reason| PredictionError::corrupt(&self.preprocessor_path, reason))?;

        let label_encoder: ClassLabelEncoder = read_json(&self.label_encoder_path)?;
        label_encoder
            .validate()
            .map_err(|reason| PredictionError::corrupt(&self.label_encoder_path, reason))?;

        if preprocessor.output_width() != classifier.input_width() {
            return Err(PredictionError::corrupt(
                &self.classifier_path,
                format!(
                    "classifier expects {} features but preprocessor produces {}",
                    classifier.input_width(),
                    preprocessor.output_width()
                ),
            ));
        }

        tracing::info!(
            "Loaded model artifacts: {} layers, {} input features, classes {:?}",
            classifier.layers.len(),
            classifier.input_dim,
            label_encoder.classes
        );

        Ok(ModelArtifacts::new(
            Box::new(classifier),
            Box::new(preprocessor),
            Box::new(label_encoder),
        ))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PredictionError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PredictionError::ResourceNotFound {
            path: path.to_path_buf(),
        },
        _ => PredictionError::corrupt(path, e.to_string()),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| PredictionError::corrupt(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn test_load_is_cached() {
        let loader = ResourceLoader::from_dir(fixture("artifacts"));
        assert!(!loader.is_loaded());

        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert!(loader.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_load_reads_once() {
        let loader = ResourceLoader::from_dir(fixture("artifacts"));

        let loaded: Vec<Arc<ModelArtifacts>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| loader.load().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loader.reads.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(loaded.iter().all(|a| Arc::ptr_eq(a, &loaded[0])));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let loader = ResourceLoader::from_dir(fixture("incomplete"));
        assert!(loader.load().is_err());
        assert!(loader.load().is_err());
        assert_eq!(loader.reads.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    fn not_found_file(dir: &str) -> PathBuf {
        match ResourceLoader::from_dir(fixture(dir)).load().unwrap_err() {
            PredictionError::ResourceNotFound { path } => path,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_preprocessor_is_not_found() {
        assert!(not_found_file("no_preprocessor").ends_with("my_data_preprocessor.json"));
    }

    #[test]
    fn test_missing_label_encoder_is_not_found() {
        assert!(not_found_file("no_label_encoder").ends_with("my_label_encoder.json"));
    }

    #[test]
    fn test_missing_model_is_not_found() {
        let loader = ResourceLoader::from_dir(fixture("incomplete"));
        match loader.load().unwrap_err() {
            PredictionError::ResourceNotFound { path } => {
                assert!(path.ends_with("my_cardio_model.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let loader = ResourceLoader::from_dir(fixture("corrupt"));
        assert!(matches!(
            loader.load(),
            Err(PredictionError::ResourceCorrupt { .. })
        ));
    }

    #[test]
    fn test_custom_file_names() {
        let settings = ArtifactSettings {
            dir: fixture("artifacts"),
            classifier: "model.h5".to_string(),
            ..Default::default()
        };
        let err = ResourceLoader::new(&settings).load().unwrap_err();
        assert!(matches!(err, PredictionError::ResourceNotFound { .. }));
    }
}
