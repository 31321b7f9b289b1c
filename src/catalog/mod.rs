//! Read-only catalog of majors joined against their universities.
//!
//! The catalog is loaded once per session from two CSV tables and never
//! mutated afterwards. Majors keep their source-file row order, which later
//! serves as the tie-break order when ranked probabilities are equal.

mod parser;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Share of a major's total capacity reserved for the UTBK admission channel.
pub const UTBK_INTAKE_SHARE: f64 = 0.4;

/// Test track determining which subject subscores are collected and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Science,
    Humanities,
}

impl Discipline {
    /// Normalizes a raw category string from the majors table. Lower-cases,
    /// trims, and maps the Indonesian synonyms used by the source data.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "science" | "saintek" => Some(Self::Science),
            "humanities" | "soshum" => Some(Self::Humanities),
            _ => None,
        }
    }

    /// Encoding used as the final element of the model feature vector.
    pub const fn encoded(self) -> f64 {
        match self {
            Self::Science => 0.0,
            Self::Humanities => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::Humanities => "humanities",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A major after normalization and the left join against universities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Major {
    pub id_major: u32,
    pub major_name: String,
    pub discipline: Discipline,
    pub id_university: u32,
    /// `None` when the university foreign key does not resolve; the major is
    /// retained regardless (left-join semantics).
    pub university_name: Option<String>,
    pub capacity: u32,
    pub utbk_capacity: u32,
    /// Admitted-candidate counter carried from the source schema. Always 0
    /// within a scoring session.
    pub passed_count: u32,
}

/// Derived UTBK intake quota. Matches the original pipeline's truncation of
/// the f64 product, so `utbk_capacity(5)` is 2, not 2.0 rounded up.
pub fn utbk_capacity(capacity: u32) -> u32 {
    (UTBK_INTAKE_SHARE * capacity as f64) as u32
}

/// Immutable joined view over the majors and universities tables, indexed by
/// major id and iterable in source-row order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    majors: Vec<Major>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    /// Loads and joins the two tables from open readers.
    pub fn load<M, U>(majors_source: M, universities_source: U) -> Result<Self, CatalogError>
    where
        M: Read,
        U: Read,
    {
        let universities: HashMap<u32, String> = parser::parse_universities(universities_source)?
            .into_iter()
            .map(|row| (row.id_university, row.university_name))
            .collect();

        let mut majors = Vec::new();
        let mut index = HashMap::new();

        for row in parser::parse_majors(majors_source)? {
            let discipline =
                Discipline::parse(&row.discipline).ok_or_else(|| CatalogError::UnknownDiscipline {
                    id_major: row.id_major,
                    raw: row.discipline.clone(),
                })?;

            if index.insert(row.id_major, majors.len()).is_some() {
                return Err(CatalogError::DuplicateMajor {
                    id_major: row.id_major,
                });
            }

            majors.push(Major {
                id_major: row.id_major,
                major_name: row.major_name,
                discipline,
                id_university: row.id_university,
                university_name: universities.get(&row.id_university).cloned(),
                utbk_capacity: utbk_capacity(row.capacity),
                capacity: row.capacity,
                passed_count: 0,
            });
        }

        Ok(Self { majors, index })
    }

    /// Loads the catalog from files on disk.
    pub fn from_paths<M, U>(majors_path: M, universities_path: U) -> Result<Self, CatalogError>
    where
        M: AsRef<Path>,
        U: AsRef<Path>,
    {
        let majors = File::open(majors_path)?;
        let universities = File::open(universities_path)?;
        Self::load(majors, universities)
    }

    pub fn get(&self, id_major: u32) -> Option<&Major> {
        self.index.get(&id_major).map(|&slot| &self.majors[slot])
    }

    /// All majors in majors-file row order.
    pub fn majors(&self) -> &[Major] {
        &self.majors
    }

    /// Majors of the requested discipline, preserving row order.
    pub fn by_discipline(&self, discipline: Discipline) -> impl Iterator<Item = &Major> {
        self.majors
            .iter()
            .filter(move |major| major.discipline == discipline)
    }

    pub fn len(&self) -> usize {
        self.majors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }
}

/// Fatal load-time failures; the session cannot proceed with partial data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate major id {id_major} in majors table")]
    DuplicateMajor { id_major: u32 },
    #[error("major {id_major} has unrecognized discipline '{raw}'")]
    UnknownDiscipline { id_major: u32, raw: String },
}
