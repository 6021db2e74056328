// src/error.rs

use std::io;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error. The display names the stage that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed: {0}")]
    Fetch(#[from] NetworkError),

    #[error("parse failed: {0}")]
    Parse(#[from] StructureError),

    #[error("decode failed in row {row}, column {column}: {source}")]
    Decode {
        row: usize,
        column: &'static str,
        #[source]
        source: FormatError,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// The fetch did not produce a 2xx body.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("GET {url} returned non-retryable status {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: LastFailure,
    },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// What the final attempt of a retried fetch observed.
#[derive(Debug)]
pub enum LastFailure {
    Status(u16),
    Transport(reqwest::Error),
}

impl std::fmt::Display for LastFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastFailure::Status(status) => write!(f, "status {}", status),
            LastFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// The document does not have the expected table shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("no <table id=\"{id}\"> in document")]
    MissingTable { id: String },

    #[error("<table id=\"{id}\"> has no <tbody>")]
    MissingBody { id: String },

    #[error("row {row} has {found} cells, expected 5")]
    CellCount { row: usize, found: usize },

    #[error("row {row} has an empty country cell")]
    EmptyCountry { row: usize },
}

/// Which numeric shorthand a cell was expected to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Magnitude,
    Percentage,
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Convention::Magnitude => f.write_str("magnitude (e.g. 1.2m, 3B)"),
            Convention::Percentage => f.write_str("percentage (e.g. 45%)"),
        }
    }
}

/// A cell's text did not match its numeric convention.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {expected} value {raw:?}: {reason}")]
pub struct FormatError {
    pub expected: Convention,
    pub raw: String,
    pub reason: &'static str,
}

impl FormatError {
    pub(crate) fn new(expected: Convention, raw: &str, reason: &'static str) -> Self {
        Self {
            expected,
            raw: raw.to_string(),
            reason,
        }
    }
}
