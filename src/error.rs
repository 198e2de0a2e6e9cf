use std::path::PathBuf;

use thiserror::Error;

/// Structural failures while reshaping upstream records.
///
/// Data-quality gaps (unknown ids, missing birth dates) never show up here;
/// normalizers absorb them and keep going.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{record} record is missing field `{field}`")]
    SchemaMismatch { record: &'static str, field: String },

    #[error("{record} field `{field}` has unexpected type (expected {expected})")]
    InvalidField {
        record: &'static str,
        field: String,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("snapshot I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidVar { key: &'static str, value: String },

    #[error("failed to read lookup file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid lookup file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("lookup key `{0}` is not a numeric id")]
    BadId(String),
}
