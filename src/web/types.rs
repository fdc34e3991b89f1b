// src/web/types.rs
use crate::analysis::HeaderPolicy;
use crate::error::{
    AnalysisError, DecodeError, ExtractionError, IngestError, ParseError, StorageError,
};
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use tracing::{error, warn};

pub struct ServerConfig {
    pub max_upload_bytes: u64,
    pub header_policy: HeaderPolicy,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct AnalyzeDocumentsRequest {
    pub resume_id: String,
    pub job_description_id: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ParseAnalysisRequest {
    #[serde(default)]
    pub analysis: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct JobUrlRequest {
    pub url: String,
}

#[derive(FromForm)]
pub struct UploadForm<'f> {
    pub file: TempFile<'f>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// Error body paired with the HTTP status it is sent with.
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub error: String,
    pub error_code: &'static str,
    pub suggestions: Vec<String>,
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn new(status: Status, error: impl Into<String>, error_code: &'static str) -> Self {
        Self {
            status,
            error: error.into(),
            error_code,
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn body(&self) -> StandardErrorResponse {
        StandardErrorResponse::new(
            self.error.clone(),
            self.error_code.to_string(),
            self.suggestions.clone(),
        )
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        if self.status.code >= 500 {
            error!("{} {} failed: {}", request.method(), request.uri(), self.error);
        } else {
            warn!("{} {} rejected: {}", request.method(), request.uri(), self.error);
        }
        (self.status, Json(self.body())).respond_to(request)
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        let message = e.to_string();
        match e {
            ExtractionError::InvalidUrl { .. } => {
                ApiError::new(Status::BadRequest, message, "INVALID_URL")
                    .with_suggestions(&["Provide an absolute http(s) URL to the job posting"])
            }
            ExtractionError::Fetch(_) => ApiError::new(Status::BadGateway, message, "FETCH_ERROR")
                .with_suggestions(&[
                    "Check that the posting is publicly reachable",
                    "Paste the job description text instead",
                ]),
            ExtractionError::InsufficientContent { .. } => {
                ApiError::new(Status::UnprocessableEntity, message, "INSUFFICIENT_CONTENT")
                    .with_suggestions(&[
                        "The page may require a login",
                        "Paste the job description text instead",
                    ])
            }
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        let message = e.to_string();
        match e {
            DecodeError::UnsupportedFormat(_) => {
                ApiError::new(Status::UnsupportedMediaType, message, "UNSUPPORTED_FORMAT")
                    .with_suggestions(&[
                        "Upload a PDF file (.pdf)",
                        "Upload a Word document (.docx)",
                    ])
            }
            DecodeError::Malformed { .. } => {
                ApiError::new(Status::UnprocessableEntity, message, "MALFORMED_DOCUMENT")
                    .with_suggestions(&["Check that the file opens correctly and upload it again"])
            }
            DecodeError::NoText(_) => {
                ApiError::new(Status::UnprocessableEntity, message, "NO_TEXT_EXTRACTED")
                    .with_suggestions(&["Scanned documents are not supported, upload a text-based file"])
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        let message = e.to_string();
        match e {
            StorageError::NotFound { .. } => ApiError::new(Status::NotFound, message, "NOT_FOUND"),
            StorageError::InvalidDocument(_) => {
                ApiError::new(Status::UnprocessableEntity, message, "INVALID_DOCUMENT")
            }
            StorageError::Database(_) => {
                ApiError::new(Status::InternalServerError, message, "DATABASE_ERROR")
                    .with_suggestions(&["Try again in a few moments"])
            }
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Extraction(e) => e.into(),
            IngestError::Decode(e) => e.into(),
            IngestError::Storage(e) => e.into(),
            IngestError::Upload(e) => ApiError::new(
                Status::InternalServerError,
                format!("Failed to process uploaded file: {}", e),
                "FILE_SAVE_ERROR",
            )
            .with_suggestions(&["Try uploading the file again"]),
            IngestError::Task(e) => ApiError::new(
                Status::InternalServerError,
                format!("Failed to decode uploaded file: {}", e),
                "INTERNAL_ERROR",
            ),
        }
    }
}

/// Client-supplied analysis text that cannot be parsed.
impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        ApiError::new(Status::UnprocessableEntity, e.to_string(), "EMPTY_ANALYSIS")
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        let message = e.to_string();
        match e {
            AnalysisError::MissingInput => {
                ApiError::new(Status::BadRequest, message, "MISSING_INPUT")
                    .with_suggestions(&["Provide both the resume text and the job description"])
            }
            AnalysisError::Storage(e) => e.into(),
            AnalysisError::Generation(_) => {
                ApiError::new(Status::BadGateway, message, "ANALYSIS_SERVICE_ERROR")
                    .with_suggestions(&["Try again in a few moments"])
            }
            AnalysisError::Parse(_) => {
                ApiError::new(Status::BadGateway, message, "EMPTY_ANALYSIS")
                    .with_suggestions(&["Try again in a few moments"])
            }
        }
    }
}
