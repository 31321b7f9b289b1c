//! Admission probability estimation for UTBK candidates.
//!
//! The crate loads a read-only catalog of university majors, builds the
//! fixed-order feature vector the pre-trained pass model was fitted on, and
//! ranks majors by predicted admission probability. Everything is wired
//! together through [`scoring::RecommendationService`]; the catalog, scaler,
//! and model are loaded once at startup and shared immutably afterwards.

pub mod catalog;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
