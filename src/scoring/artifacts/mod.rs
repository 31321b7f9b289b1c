//! Pre-fitted inference artifacts: the min-max scaling transform and the
//! feed-forward pass model. Both are opaque collaborators produced by the
//! training pipeline; this crate only deserializes and runs them. Any
//! absence or shape mismatch is fatal at load time, never per request.

mod model;
mod scaler;

pub use model::{Activation, PassModel};
pub use scaler::MinMaxScaler;

/// Load-time failures for serialized model and scaler artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scaler feature order {found:?} does not match the training schema {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("scaler statistics must cover {expected} features, found {found}")]
    FeatureWidth { expected: usize, found: usize },
    #[error("model artifact defines no layers")]
    EmptyModel,
    #[error("layer {layer} defines no units")]
    EmptyLayer { layer: usize },
    #[error("layer {layer} expects {expected} inputs per unit, found a row of {found}")]
    LayerShape {
        layer: usize,
        expected: usize,
        found: usize,
    },
    #[error("layer {layer} has {units} units but {bias} bias terms")]
    BiasShape {
        layer: usize,
        units: usize,
        bias: usize,
    },
    #[error("model must emit a single probability, final layer has {found} outputs")]
    OutputWidth { found: usize },
}
