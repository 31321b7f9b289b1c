use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;

use super::artifacts::{MinMaxScaler, PassModel};
use super::domain::{CandidateProfile, ScoredMajor, ValidationError};
use super::features::{feature_vector, AggregateScores};

/// Minimum predicted probability for a major to be recommended.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Stateless scorer over immutably shared catalog and inference artifacts.
///
/// All collaborators are injected at construction; a request is a pure
/// computation, so one service instance can serve any number of concurrent
/// requests without locking.
pub struct RecommendationService {
    catalog: Arc<Catalog>,
    scaler: Arc<MinMaxScaler>,
    model: Arc<PassModel>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<Catalog>, scaler: Arc<MinMaxScaler>, model: Arc<PassModel>) -> Self {
        Self {
            catalog,
            scaler,
            model,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Scores every major of the candidate's discipline and returns those at
    /// or above `threshold`, ranked by probability descending. Ties keep
    /// catalog row order. An empty result is a legitimate outcome, not an
    /// error.
    pub fn recommend(
        &self,
        profile: &CandidateProfile,
        threshold: f64,
    ) -> Result<Vec<ScoredMajor>, ValidationError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::InvalidThreshold { value: threshold });
        }

        let aggregates = AggregateScores::from_profile(profile)?;

        let mut ranked = Vec::new();
        for major in self.catalog.by_discipline(profile.discipline) {
            let features = feature_vector(major, &aggregates, profile.discipline);
            let scaled = self.scaler.transform(&features);
            let prob_pass = self.model.predict(&scaled);

            if prob_pass >= threshold {
                ranked.push(ScoredMajor {
                    id_major: major.id_major,
                    major_name: major.major_name.clone(),
                    university_name: major.university_name.clone(),
                    prob_pass,
                    capacity: major.capacity,
                    utbk_capacity: major.utbk_capacity,
                });
            }
        }

        // Stable sort keeps catalog order for equal probabilities.
        ranked.sort_by(|a, b| b.prob_pass.total_cmp(&a.prob_pass));

        debug!(
            discipline = %profile.discipline,
            threshold,
            retained = ranked.len(),
            "scored catalog slice"
        );

        Ok(ranked)
    }
}
