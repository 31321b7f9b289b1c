use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::scoring::features::FEATURE_WIDTH;

use super::ArtifactError;

/// Per-unit activation applied after the affine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Linear => x,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    layers: Vec<LayerArtifact>,
}

#[derive(Debug, Deserialize)]
struct LayerArtifact {
    /// Row per unit, column per input.
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    activation: Activation,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    activation: Activation,
}

/// Pre-trained feed-forward network emitting a single pass probability.
///
/// Layer shapes are chained and checked once at load so that inference can
/// run without per-request error paths: the first layer must accept the
/// 8-wide feature vector and the final layer must emit one value.
#[derive(Debug, Clone)]
pub struct PassModel {
    layers: Vec<DenseLayer>,
}

impl PassModel {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        if artifact.layers.is_empty() {
            return Err(ArtifactError::EmptyModel);
        }

        let mut layers = Vec::with_capacity(artifact.layers.len());
        let mut expected_inputs = FEATURE_WIDTH;

        for (slot, layer) in artifact.layers.into_iter().enumerate() {
            let units = layer.weights.len();
            if units == 0 {
                return Err(ArtifactError::EmptyLayer { layer: slot });
            }
            for row in &layer.weights {
                if row.len() != expected_inputs {
                    return Err(ArtifactError::LayerShape {
                        layer: slot,
                        expected: expected_inputs,
                        found: row.len(),
                    });
                }
            }
            if layer.bias.len() != units {
                return Err(ArtifactError::BiasShape {
                    layer: slot,
                    units,
                    bias: layer.bias.len(),
                });
            }

            expected_inputs = units;
            layers.push(DenseLayer {
                weights: layer.weights,
                bias: layer.bias,
                activation: layer.activation,
            });
        }

        if expected_inputs != 1 {
            return Err(ArtifactError::OutputWidth {
                found: expected_inputs,
            });
        }

        Ok(Self { layers })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        Self::from_reader(File::open(path)?)
    }

    /// Runs the network on one scaled feature vector. The result is clamped
    /// to [0, 1] so callers can treat it as a probability even when the
    /// final activation is linear.
    pub fn predict(&self, features: &[f64; FEATURE_WIDTH]) -> f64 {
        let mut activations: Vec<f64> = features.to_vec();

        for layer in &self.layers {
            let mut next = Vec::with_capacity(layer.bias.len());
            for (row, bias) in layer.weights.iter().zip(&layer.bias) {
                let z: f64 = row
                    .iter()
                    .zip(&activations)
                    .map(|(weight, input)| weight * input)
                    .sum::<f64>()
                    + bias;
                next.push(layer.activation.apply(z));
            }
            activations = next;
        }

        // Load-time validation guarantees a single output unit.
        activations[0].clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn logistic_model(weights: [f64; FEATURE_WIDTH], bias: f64) -> PassModel {
        let json = serde_json::json!({
            "layers": [{
                "weights": [weights],
                "bias": [bias],
                "activation": "sigmoid"
            }]
        });
        PassModel::from_reader(Cursor::new(json.to_string())).expect("model loads")
    }

    #[test]
    fn zero_weight_logistic_layer_emits_exactly_half() {
        let model = logistic_model([0.0; FEATURE_WIDTH], 0.0);
        assert_eq!(model.predict(&[1.0; FEATURE_WIDTH]), 0.5);
    }

    #[test]
    fn logistic_layer_matches_hand_computation() {
        let mut weights = [0.0; FEATURE_WIDTH];
        weights[4] = 2.0;
        let model = logistic_model(weights, -1.0);

        let mut input = [0.0; FEATURE_WIDTH];
        input[4] = 1.0;
        let expected = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((model.predict(&input) - expected).abs() < 1e-12);
    }

    #[test]
    fn relu_hidden_layer_feeds_forward() {
        let json = r#"{
            "layers": [
                {
                    "weights": [
                        [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                        [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
                    ],
                    "bias": [0.0, 0.0],
                    "activation": "relu"
                },
                {
                    "weights": [[1.0, 1.0]],
                    "bias": [0.0],
                    "activation": "linear"
                }
            ]
        }"#;
        let model = PassModel::from_reader(Cursor::new(json)).expect("model loads");

        // relu keeps 0.75 on the first unit, clips -0.75 to zero on the second.
        let mut input = [0.0; FEATURE_WIDTH];
        input[0] = 0.75;
        assert_eq!(model.predict(&input), 0.75);
    }

    #[test]
    fn linear_output_is_clamped_to_probability_range() {
        let json = r#"{
            "layers": [{
                "weights": [[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]],
                "bias": [0.0],
                "activation": "linear"
            }]
        }"#;
        let model = PassModel::from_reader(Cursor::new(json)).expect("model loads");
        assert_eq!(model.predict(&[1.0; FEATURE_WIDTH]), 1.0);
        assert_eq!(model.predict(&[-1.0; FEATURE_WIDTH]), 0.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let error =
            PassModel::from_reader(Cursor::new(r#"{ "layers": [] }"#)).expect_err("empty model");
        assert!(matches!(error, ArtifactError::EmptyModel));
    }

    #[test]
    fn mismatched_layer_width_is_rejected() {
        let json = r#"{
            "layers": [{
                "weights": [[1.0, 2.0]],
                "bias": [0.0],
                "activation": "sigmoid"
            }]
        }"#;
        let error = PassModel::from_reader(Cursor::new(json)).expect_err("narrow layer");
        assert!(matches!(
            error,
            ArtifactError::LayerShape {
                layer: 0,
                expected: FEATURE_WIDTH,
                found: 2
            }
        ));
    }

    #[test]
    fn mismatched_bias_width_is_rejected() {
        let json = r#"{
            "layers": [{
                "weights": [[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]],
                "bias": [0.0, 0.0],
                "activation": "sigmoid"
            }]
        }"#;
        let error = PassModel::from_reader(Cursor::new(json)).expect_err("extra bias");
        assert!(matches!(
            error,
            ArtifactError::BiasShape {
                layer: 0,
                units: 1,
                bias: 2
            }
        ));
    }

    #[test]
    fn multi_output_final_layer_is_rejected() {
        let json = r#"{
            "layers": [{
                "weights": [
                    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
                ],
                "bias": [0.0, 0.0],
                "activation": "sigmoid"
            }]
        }"#;
        let error = PassModel::from_reader(Cursor::new(json)).expect_err("two outputs");
        assert!(matches!(error, ArtifactError::OutputWidth { found: 2 }));
    }
}
