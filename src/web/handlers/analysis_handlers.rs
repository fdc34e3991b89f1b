// src/web/handlers/analysis_handlers.rs
use crate::analysis::{parse_analysis, AnalysisGenerator, ParsedAnalysis};
use crate::database::Database;
use crate::services::{analyze_documents, analyze_texts, AnalysisReport};
use crate::web::types::*;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

pub async fn analyze_handler(
    request: Json<AnalyzeRequest>,
    generator: &State<Arc<dyn AnalysisGenerator>>,
    config: &State<ServerConfig>,
) -> ApiResult<AnalysisReport> {
    let report = analyze_texts(
        generator.inner().as_ref(),
        &request.resume_text,
        &request.job_description,
        config.header_policy,
    )
    .await?;
    Ok(Json(report))
}

pub async fn analyze_documents_handler(
    request: Json<AnalyzeDocumentsRequest>,
    db: &State<Database>,
    generator: &State<Arc<dyn AnalysisGenerator>>,
    config: &State<ServerConfig>,
) -> ApiResult<AnalysisReport> {
    let report = analyze_documents(
        db,
        generator.inner().as_ref(),
        &request.resume_id,
        &request.job_description_id,
        config.header_policy,
    )
    .await?;
    Ok(Json(report))
}

/// Re-parse a previously generated analysis without calling the model.
pub async fn parse_analysis_handler(
    request: Json<ParseAnalysisRequest>,
    config: &State<ServerConfig>,
) -> ApiResult<ParsedAnalysis> {
    let parsed = parse_analysis(&request.analysis, config.header_policy)?;
    Ok(Json(parsed))
}
