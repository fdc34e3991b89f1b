// src/services/ingest.rs
//! Turns uploaded files and job-posting URLs into stored documents.

use crate::database::{Database, Document, DocumentKind, NewDocument};
use crate::decoding::{decode_as, DocumentFormat};
use crate::error::{DecodeError, IngestError};
use crate::job_extraction::JobExtractor;
use tracing::info;

/// Decode an uploaded file and store its text as a `kind` document.
///
/// The format comes from `content_type` when it names PDF or DOCX, otherwise
/// from the extension of `file_name`.
pub async fn ingest_upload(
    db: &Database,
    kind: DocumentKind,
    file_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<Document, IngestError> {
    let format = DocumentFormat::detect(content_type, file_name).ok_or_else(|| {
        DecodeError::UnsupportedFormat(
            content_type
                .map(str::to_string)
                .unwrap_or_else(|| file_name.to_string()),
        )
    })?;

    info!(
        "Decoding {} upload '{}' ({} bytes)",
        format.label(),
        file_name,
        bytes.len()
    );
    let text = tokio::task::spawn_blocking(move || decode_as(&bytes, format)).await??;

    let document = db
        .documents()
        .create(NewDocument::uploaded(kind, text, file_name.to_string()))
        .await?;
    Ok(document)
}

/// Fetch a job posting and store its description.
pub async fn ingest_job_url(
    db: &Database,
    extractor: &JobExtractor,
    url: &str,
) -> Result<Document, IngestError> {
    let posting = extractor.extract(url).await?;

    let document = db
        .documents()
        .create(NewDocument {
            kind: DocumentKind::JobDescription,
            file_name: posting.file_name(),
            text: posting.description,
            title: posting.title,
            company: posting.company,
            source_url: Some(url.to_string()),
        })
        .await?;
    Ok(document)
}
