// src/web/handlers/document_handlers.rs
use crate::database::{Database, Document, DocumentKind};
use crate::error::IngestError;
use crate::job_extraction::JobExtractor;
use crate::services::{ingest_job_url, ingest_upload};
use crate::web::types::*;
use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

const DEFAULT_UPLOAD_NAME: &str = "uploaded_document";

pub async fn upload_document_handler(
    mut upload: Form<UploadForm<'_>>,
    kind: DocumentKind,
    db: &State<Database>,
    config: &State<ServerConfig>,
) -> ApiResult<Document> {
    let file_size = upload.file.len();
    if file_size > config.max_upload_bytes {
        return Err(ApiError::new(
            Status::PayloadTooLarge,
            format!(
                "File size exceeds the {} byte limit",
                config.max_upload_bytes
            ),
            "FILE_TOO_LARGE",
        )
        .with_suggestions(&["Upload a smaller file"]));
    }

    let content_type = upload.file.content_type().map(|ct| ct.to_string());
    let file_name = upload
        .file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(base_file_name)
        .unwrap_or(DEFAULT_UPLOAD_NAME)
        .to_string();

    info!(
        "Received {} upload '{}' ({} bytes, {})",
        kind.label().to_lowercase(),
        file_name,
        file_size,
        content_type.as_deref().unwrap_or("unknown type")
    );

    let temp_path = std::env::temp_dir().join(format!("ats_upload_{}", uuid::Uuid::new_v4()));
    let bytes = match upload.file.persist_to(&temp_path).await {
        Ok(()) => tokio::fs::read(&temp_path).await,
        Err(e) => Err(e),
    };
    let _ = tokio::fs::remove_file(&temp_path).await;
    let bytes = bytes.map_err(|e| {
        error!("Failed to save uploaded file: {}", e);
        ApiError::from(IngestError::Upload(e))
    })?;

    let document = ingest_upload(db, kind, &file_name, content_type.as_deref(), bytes).await?;
    Ok(Json(document))
}

pub async fn ingest_job_url_handler(
    request: Json<JobUrlRequest>,
    db: &State<Database>,
    extractor: &State<JobExtractor>,
) -> ApiResult<Document> {
    let document = ingest_job_url(db, extractor, request.url.trim()).await?;
    Ok(Json(document))
}

pub async fn list_documents_handler(
    kind: DocumentKind,
    db: &State<Database>,
) -> ApiResult<Vec<Document>> {
    let documents = db.documents().list(kind).await?;
    Ok(Json(documents))
}

pub async fn delete_document_handler(
    kind: DocumentKind,
    id: &str,
    db: &State<Database>,
) -> ApiResult<ActionResponse> {
    db.documents().delete_by_id(kind, id).await?;
    Ok(Json(ActionResponse::success(
        format!("{} deleted successfully", kind.label()),
        "deleted".to_string(),
    )))
}

/// Last path component of a client-supplied file name.
fn base_file_name(raw: &str) -> Option<&str> {
    raw.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
