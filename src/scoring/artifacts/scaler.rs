use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::scoring::features::{FEATURE_NAMES, FEATURE_WIDTH};

use super::ArtifactError;

#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    feature_names: Vec<String>,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
}

/// Min-max normalization fitted at training time.
///
/// The transform must see features in exactly the order the scaler was
/// fitted on; a reordered vector would produce silently wrong probabilities.
/// Loading therefore rejects any artifact whose `feature_names` deviate from
/// [`FEATURE_NAMES`].
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: ScalerArtifact = serde_json::from_reader(reader)?;

        if artifact.feature_names != FEATURE_NAMES {
            return Err(ArtifactError::FeatureOrderMismatch {
                expected: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
                found: artifact.feature_names,
            });
        }
        for stats in [&artifact.data_min, &artifact.data_max] {
            if stats.len() != FEATURE_WIDTH {
                return Err(ArtifactError::FeatureWidth {
                    expected: FEATURE_WIDTH,
                    found: stats.len(),
                });
            }
        }

        let scale = artifact
            .data_min
            .iter()
            .zip(&artifact.data_max)
            .map(|(min, max)| {
                let range = max - min;
                // Constant features scale to zero with a unit divisor, as in
                // the fitting library.
                if range == 0.0 {
                    1.0
                } else {
                    range
                }
            })
            .collect();

        Ok(Self {
            data_min: artifact.data_min,
            scale,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        Self::from_reader(File::open(path)?)
    }

    /// Rescales one feature vector into the model's input space.
    pub fn transform(&self, features: &[f64; FEATURE_WIDTH]) -> [f64; FEATURE_WIDTH] {
        let mut scaled = [0.0; FEATURE_WIDTH];
        for (slot, ((value, min), scale)) in scaled
            .iter_mut()
            .zip(features.iter().zip(&self.data_min).zip(&self.scale))
        {
            *slot = (value - min) / scale;
        }
        scaled
    }
}
