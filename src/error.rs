// src/error.rs
//! Typed errors for the extraction, parsing, decoding and storage layers.
//! Web handlers map these onto HTTP statuses in `web::types`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not extract a job description from {url}. The page might require authentication or use an unsupported layout")]
    InsufficientContent { url: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Page at {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Analysis response is empty")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read {format} document: {reason}")]
    Malformed { format: &'static str, reason: String },

    #[error("No text could be extracted from the {0} document")]
    NoText(&'static str),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to read uploaded file: {0}")]
    Upload(#[from] std::io::Error),

    #[error("Document decoding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Both resume and job description are required")]
    MissingInput,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Analysis service failed: {0:#}")]
    Generation(anyhow::Error),

    #[error("Analysis service returned an unusable response: {0}")]
    Parse(#[from] ParseError),
}
