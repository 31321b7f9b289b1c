use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Discipline;

/// Bounds enforced on every raw subscore before it reaches the model.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 1000.0;

/// UTBK subject subscores. Wire names follow the original request schema
/// (`score_kpu`, `score_mat_tka`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "score_kpu")]
    Kpu,
    #[serde(rename = "score_kua")]
    Kua,
    #[serde(rename = "score_ppu")]
    Ppu,
    #[serde(rename = "score_kmb")]
    Kmb,
    #[serde(rename = "score_mat_tka")]
    Mat,
    #[serde(rename = "score_fis")]
    Fis,
    #[serde(rename = "score_kim")]
    Kim,
    #[serde(rename = "score_bio")]
    Bio,
    #[serde(rename = "score_geo")]
    Geo,
    #[serde(rename = "score_sej")]
    Sej,
    #[serde(rename = "score_sos")]
    Sos,
    #[serde(rename = "score_eko")]
    Eko,
}

impl Subject {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Kpu => "KPU",
            Self::Kua => "KUA",
            Self::Ppu => "PPU",
            Self::Kmb => "KMB",
            Self::Mat => "MAT",
            Self::Fis => "FIS",
            Self::Kim => "KIM",
            Self::Bio => "BIO",
            Self::Geo => "GEO",
            Self::Sej => "SEJ",
            Self::Sos => "SOS",
            Self::Eko => "EKO",
        }
    }

    /// Resolves a short subject code, case-insensitively. Used by the CLI.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "KPU" => Some(Self::Kpu),
            "KUA" => Some(Self::Kua),
            "PPU" => Some(Self::Ppu),
            "KMB" => Some(Self::Kmb),
            "MAT" => Some(Self::Mat),
            "FIS" => Some(Self::Fis),
            "KIM" => Some(Self::Kim),
            "BIO" => Some(Self::Bio),
            "GEO" => Some(Self::Geo),
            "SEJ" => Some(Self::Sej),
            "SOS" => Some(Self::Sos),
            "EKO" => Some(Self::Eko),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Subject lists scored for one discipline. Data-driven so that adding a
/// third track only means adding a blueprint, not a new code path.
#[derive(Debug, Clone, Copy)]
pub struct DisciplineBlueprint {
    pub aptitude: &'static [Subject],
    pub specialization: &'static [Subject],
}

const APTITUDE: [Subject; 4] = [Subject::Kpu, Subject::Kua, Subject::Ppu, Subject::Kmb];

static SCIENCE_BLUEPRINT: DisciplineBlueprint = DisciplineBlueprint {
    aptitude: &APTITUDE,
    specialization: &[Subject::Mat, Subject::Fis, Subject::Kim, Subject::Bio],
};

static HUMANITIES_BLUEPRINT: DisciplineBlueprint = DisciplineBlueprint {
    aptitude: &APTITUDE,
    specialization: &[
        Subject::Mat,
        Subject::Geo,
        Subject::Sej,
        Subject::Sos,
        Subject::Eko,
    ],
};

impl DisciplineBlueprint {
    pub fn for_discipline(discipline: Discipline) -> &'static Self {
        match discipline {
            Discipline::Science => &SCIENCE_BLUEPRINT,
            Discipline::Humanities => &HUMANITIES_BLUEPRINT,
        }
    }

    pub fn subjects(&self) -> impl Iterator<Item = Subject> + '_ {
        self.aptitude
            .iter()
            .chain(self.specialization.iter())
            .copied()
    }

    pub fn subject_count(&self) -> usize {
        self.aptitude.len() + self.specialization.len()
    }
}

/// One candidate's session input: the chosen test track and raw subscores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub discipline: Discipline,
    pub scores: BTreeMap<Subject, f64>,
}

/// One ranked recommendation produced for a scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMajor {
    pub id_major: u32,
    pub major_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    pub prob_pass: f64,
    pub capacity: u32,
    pub utbk_capacity: u32,
}

/// Caller-input violations, rejected before any inference runs.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("missing {subject} score for {discipline} candidates")]
    MissingSubject {
        discipline: Discipline,
        subject: Subject,
    },
    #[error("{subject} score {value} is outside {SCORE_MIN}..={SCORE_MAX}")]
    ScoreOutOfRange { subject: Subject, value: f64 },
    #[error("{subject} score is not a finite number")]
    NonFiniteScore { subject: Subject },
    #[error("threshold {value} must lie within 0.0..=1.0")]
    InvalidThreshold { value: f64 },
    #[error("unrecognized discipline '{raw}', expected 'science' or 'humanities'")]
    UnknownDiscipline { raw: String },
}
