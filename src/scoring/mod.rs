//! Feature construction, artifact inference, and ranked recommendation.
//!
//! A scoring request flows raw subscores through [`features::AggregateScores`]
//! into one fixed-order vector per candidate major, rescales it with the
//! pre-fitted [`MinMaxScaler`], obtains a pass probability from the
//! [`PassModel`], and returns the thresholded, ranked result.

pub mod artifacts;
pub mod domain;
pub mod features;
pub mod router;
pub mod service;

pub use artifacts::{Activation, ArtifactError, MinMaxScaler, PassModel};
pub use domain::{
    CandidateProfile, DisciplineBlueprint, ScoredMajor, Subject, ValidationError, SCORE_MAX,
    SCORE_MIN,
};
pub use features::{feature_vector, AggregateScores, FEATURE_NAMES, FEATURE_WIDTH};
pub use router::recommendation_router;
pub use service::{RecommendationService, DEFAULT_THRESHOLD};
