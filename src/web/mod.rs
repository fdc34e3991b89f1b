// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::analysis::{AnalysisGenerator, LlmClient, ParsedAnalysis};
use crate::database::{Database, Document, DocumentKind};
use crate::environment::EnvironmentConfig;
use crate::job_extraction::JobExtractor;
use crate::services::AnalysisReport;
use anyhow::Result;
use rocket::data::{ByteUnit, Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{info, warn};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/analyze", data = "<request>")]
pub async fn analyze(
    request: Json<AnalyzeRequest>,
    generator: &State<Arc<dyn AnalysisGenerator>>,
    config: &State<ServerConfig>,
) -> ApiResult<AnalysisReport> {
    handlers::analyze_handler(request, generator, config).await
}

#[post("/analyze/documents", data = "<request>")]
pub async fn analyze_documents(
    request: Json<AnalyzeDocumentsRequest>,
    db: &State<Database>,
    generator: &State<Arc<dyn AnalysisGenerator>>,
    config: &State<ServerConfig>,
) -> ApiResult<AnalysisReport> {
    handlers::analyze_documents_handler(request, db, generator, config).await
}

#[post("/analysis/parse", data = "<request>")]
pub async fn parse_analysis(
    request: Json<ParseAnalysisRequest>,
    config: &State<ServerConfig>,
) -> ApiResult<ParsedAnalysis> {
    handlers::parse_analysis_handler(request, config).await
}

#[post("/job-descriptions/url", data = "<request>")]
pub async fn ingest_job_url(
    request: Json<JobUrlRequest>,
    db: &State<Database>,
    extractor: &State<JobExtractor>,
) -> ApiResult<Document> {
    handlers::ingest_job_url_handler(request, db, extractor).await
}

#[post("/upload/resume", data = "<upload>")]
pub async fn upload_resume(
    upload: Form<UploadForm<'_>>,
    db: &State<Database>,
    config: &State<ServerConfig>,
) -> ApiResult<Document> {
    handlers::upload_document_handler(upload, DocumentKind::Resume, db, config).await
}

#[post("/upload/jobDescription", data = "<upload>")]
pub async fn upload_job_description(
    upload: Form<UploadForm<'_>>,
    db: &State<Database>,
    config: &State<ServerConfig>,
) -> ApiResult<Document> {
    handlers::upload_document_handler(upload, DocumentKind::JobDescription, db, config).await
}

#[get("/resumes")]
pub async fn list_resumes(db: &State<Database>) -> ApiResult<Vec<Document>> {
    handlers::list_documents_handler(DocumentKind::Resume, db).await
}

#[get("/job-descriptions")]
pub async fn list_job_descriptions(db: &State<Database>) -> ApiResult<Vec<Document>> {
    handlers::list_documents_handler(DocumentKind::JobDescription, db).await
}

#[delete("/resumes/<id>")]
pub async fn delete_resume(id: &str, db: &State<Database>) -> ApiResult<ActionResponse> {
    handlers::delete_document_handler(DocumentKind::Resume, id, db).await
}

#[delete("/job-descriptions/<id>")]
pub async fn delete_job_description(
    id: &str,
    db: &State<Database>,
) -> ApiResult<ActionResponse> {
    handlers::delete_document_handler(DocumentKind::JobDescription, id, db).await
}

#[get("/health")]
pub async fn health(db: &State<Database>) -> ApiResult<TextResponse> {
    handlers::health_handler(db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is too large".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Upload a smaller file".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be processed".to_string(),
        "UNPROCESSABLE_REQUEST".to_string(),
        vec![
            "Send JSON with camelCase field names".to_string(),
            "Uploads must be multipart/form-data with a 'file' field".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application with its managed state; nothing is bound yet.
pub fn build_rocket(
    port: u16,
    server_config: ServerConfig,
    db: Database,
    extractor: JobExtractor,
    generator: Arc<dyn AnalysisGenerator>,
) -> Rocket<Build> {
    let upload_limit = ByteUnit::from(server_config.max_upload_bytes);
    let limits = Limits::default()
        .limit("file", upload_limit)
        .limit("data-form", upload_limit + 1.mebibytes())
        .limit("json", 2.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(server_config)
        .manage(db)
        .manage(extractor)
        .manage(generator)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                analyze,
                analyze_documents,
                parse_analysis,
                ingest_job_url,
                upload_resume,
                upload_job_description,
                list_resumes,
                list_job_descriptions,
                delete_resume,
                delete_job_description,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig) -> Result<()> {
    config.ensure_directories().await?;

    let db = Database::connect(&config.database_path).await?;
    db.migrate().await?;

    let extractor = JobExtractor::new(&config.extractor)?;
    let llm_client = LlmClient::from_env(config.llm.clone())?;
    if !llm_client.is_configured() {
        warn!("OPENAI_API_KEY is not set; analysis requests will fail until it is provided");
    }

    info!("Starting ATS matcher API server");
    info!("Database: {}", config.database_path.display());
    info!("Analysis model: {} via {}", config.llm.model, config.llm.api_url);
    info!("Section header policy: {:?}", config.analysis.header_policy);

    let server_config = ServerConfig {
        max_upload_bytes: config.max_upload_bytes,
        header_policy: config.analysis.header_policy,
    };
    let generator: Arc<dyn AnalysisGenerator> = Arc::new(llm_client);

    build_rocket(config.port, server_config, db, extractor, generator)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
