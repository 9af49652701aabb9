//! Error types for parsing scraped values and setting up ingestion runs.
//!
//! Data-quality problems (bad dates, bad prices) are reported through
//! `ParseError` so callers decide explicitly whether to skip or drop.
//! `IngestError` covers the few conditions that abort a whole batch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty value")]
    Empty,

    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("price must be positive, got {0}")]
    NonPositive(f64),

    #[error("price is not finite: {0:?}")]
    NonFinite(String),

    #[error("unrecognized date: {0:?}")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to build ingest worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("market sink rejected append: {0}")]
    Sink(String),
}
