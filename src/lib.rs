//! Resume-to-job relevance ranking.
//!
//! Candidates are scored per category with sentence embeddings and fuzzy
//! string matching, aggregated into one weighted score, and merged into a
//! persisted per-job ranking.

pub mod config;
pub mod duration;
pub mod embedding;
pub mod errors;
pub mod fuzzy;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod semantic;
pub mod text;
