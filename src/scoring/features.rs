//! Aggregate score computation and feature vector assembly.
//!
//! The vector layout is an artifact-compatibility constraint: the pass model
//! was trained with the major and university ids duplicated in positions 0-3,
//! so the layout here must match the training schema exactly. Changing it
//! requires retraining the model, not editing this module.

use std::collections::BTreeMap;

use crate::catalog::{Discipline, Major};

use super::domain::{
    CandidateProfile, DisciplineBlueprint, Subject, ValidationError, SCORE_MAX, SCORE_MIN,
};

/// Width of the model input; fixed by the trained artifact.
pub const FEATURE_WIDTH: usize = 8;

/// Canonical feature order fitted at training time. A scaler artifact naming
/// anything else is rejected at load.
pub const FEATURE_NAMES: [&str; FEATURE_WIDTH] = [
    "id_major",
    "id_university",
    "id_major_choice",
    "id_university_choice",
    "general_score",
    "specialize_score",
    "score_mean",
    "test_type",
];

/// The three aggregate means derived from one candidate's subscores. Fixed
/// for the whole scoring pass; only the id fields vary per major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateScores {
    pub general: f64,
    pub specialization: f64,
    pub overall: f64,
}

impl AggregateScores {
    /// Validates and aggregates the raw subscores for one discipline.
    ///
    /// Every blueprint subject must be present, finite, and within
    /// [`SCORE_MIN`]..=[`SCORE_MAX`]; subjects outside the blueprint are
    /// ignored.
    pub fn from_profile(profile: &CandidateProfile) -> Result<Self, ValidationError> {
        Self::compute(profile.discipline, &profile.scores)
    }

    pub fn compute(
        discipline: Discipline,
        scores: &BTreeMap<Subject, f64>,
    ) -> Result<Self, ValidationError> {
        let blueprint = DisciplineBlueprint::for_discipline(discipline);

        let mut general_sum = 0.0;
        for &subject in blueprint.aptitude {
            general_sum += validated_score(scores, discipline, subject)?;
        }

        let mut specialization_sum = 0.0;
        for &subject in blueprint.specialization {
            specialization_sum += validated_score(scores, discipline, subject)?;
        }

        Ok(Self {
            general: general_sum / blueprint.aptitude.len() as f64,
            specialization: specialization_sum / blueprint.specialization.len() as f64,
            overall: (general_sum + specialization_sum) / blueprint.subject_count() as f64,
        })
    }
}

fn validated_score(
    scores: &BTreeMap<Subject, f64>,
    discipline: Discipline,
    subject: Subject,
) -> Result<f64, ValidationError> {
    let value = scores
        .get(&subject)
        .copied()
        .ok_or(ValidationError::MissingSubject {
            discipline,
            subject,
        })?;

    if !value.is_finite() {
        return Err(ValidationError::NonFiniteScore { subject });
    }
    if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange { subject, value });
    }

    Ok(value)
}

/// Assembles the model input for one candidate major.
pub fn feature_vector(
    major: &Major,
    aggregates: &AggregateScores,
    discipline: Discipline,
) -> [f64; FEATURE_WIDTH] {
    [
        major.id_major as f64,
        major.id_university as f64,
        major.id_major as f64,
        major.id_university as f64,
        aggregates.general,
        aggregates.specialization,
        aggregates.overall,
        discipline.encoded(),
    ]
}
