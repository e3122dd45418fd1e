use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// Binary classifier producing the probability of the positive class
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;

    /// Feature vector width the classifier accepts
    fn input_width(&self) -> usize;

    /// Number of layers, for diagnostics
    fn depth(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    #[inline]
    fn apply(self, z: f64) -> f64 {
        match self {
            Self::Linear => z,
            Self::Relu => z.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Self::Tanh => z.tanh(),
        }
    }
}

/// Fully connected layer; `kernel` is laid out `[input][unit]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub units: usize,
    pub activation: Activation,
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.kernel) {
            for (acc, w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        for v in out.iter_mut() {
            *v = self.activation.apply(*v);
        }
        out
    }
}

/// Feed-forward network exported from the training run
///
/// The last layer must be a single sigmoid unit so the output is a probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    pub input_dim: usize,
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Structural checks run once when the artifact is loaded
    pub fn validate(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }

        let mut width = self.input_dim;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.kernel.len() != width {
                return Err(format!(
                    "layer {} kernel has {} rows, expected {}",
                    i,
                    layer.kernel.len(),
                    width
                ));
            }
            if layer.kernel.iter().any(|row| row.len() != layer.units) {
                return Err(format!("layer {} kernel rows must have {} entries", i, layer.units));
            }
            if layer.bias.len() != layer.units {
                return Err(format!(
                    "layer {} bias has {} entries, expected {}",
                    i,
                    layer.bias.len(),
                    layer.units
                ));
            }
            let finite = layer.kernel.iter().flatten().chain(&layer.bias).all(|w| w.is_finite());
            if !finite {
                return Err(format!("layer {} has non-finite weights", i));
            }
            width = layer.units;
        }

        // Non-empty checked above
        let last = &self.layers[self.layers.len() - 1];
        if last.units != 1 || last.activation != Activation::Sigmoid {
            return Err("output layer must be a single sigmoid unit".to_string());
        }

        Ok(())
    }
}

impl Classifier for DenseNetwork {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.input_dim {
            return Err(PredictionError::mismatch(format!(
                "classifier expects {} features, got {}",
                self.input_dim,
                features.len()
            )));
        }

        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        match activations.first() {
            Some(p) if p.is_finite() => Ok(*p),
            Some(p) => Err(PredictionError::mismatch(format!("classifier produced {}", p))),
            None => Err(PredictionError::mismatch("classifier produced no output")),
        }
    }

    fn input_width(&self) -> usize {
        self.input_dim
    }

    fn depth(&self) -> usize {
        self.layers.len()
    }
}
