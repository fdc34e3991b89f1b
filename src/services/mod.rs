// src/services/mod.rs
pub mod analysis;
pub mod ingest;

pub use analysis::{analyze_documents, analyze_texts, AnalysisReport};
pub use ingest::{ingest_job_url, ingest_upload};
