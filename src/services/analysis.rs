// src/services/analysis.rs
use crate::analysis::{parse_analysis, AnalysisGenerator, AnalysisSection, HeaderPolicy, MatchScore};
use crate::database::{Database, DocumentKind};
use crate::error::AnalysisError;
use serde::Serialize;
use tracing::{info, warn};

/// Raw analysis text plus its parsed sections and score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analysis: String,
    pub sections: Vec<AnalysisSection>,
    pub match_score: MatchScore,
}

pub async fn analyze_texts(
    generator: &dyn AnalysisGenerator,
    resume_text: &str,
    job_description: &str,
    policy: HeaderPolicy,
) -> Result<AnalysisReport, AnalysisError> {
    if resume_text.trim().is_empty() || job_description.trim().is_empty() {
        return Err(AnalysisError::MissingInput);
    }

    info!(
        "Analyzing resume ({} chars) against job description ({} chars)",
        resume_text.len(),
        job_description.len()
    );

    let analysis = generator
        .generate_analysis(resume_text, job_description)
        .await
        .map_err(AnalysisError::Generation)?;

    let parsed = parse_analysis(&analysis, policy)?;
    if parsed.sections.is_empty() {
        warn!("Analysis response contained no numbered sections");
    }
    info!(
        "Analysis complete: {} sections, match score {:?}",
        parsed.sections.len(),
        parsed.match_score.value()
    );

    Ok(AnalysisReport {
        analysis,
        sections: parsed.sections,
        match_score: parsed.match_score,
    })
}

/// Look both documents up by id, then analyze their texts.
pub async fn analyze_documents(
    db: &Database,
    generator: &dyn AnalysisGenerator,
    resume_id: &str,
    job_description_id: &str,
    policy: HeaderPolicy,
) -> Result<AnalysisReport, AnalysisError> {
    let repo = db.documents();
    let resume = repo.get(DocumentKind::Resume, resume_id).await?;
    let job = repo
        .get(DocumentKind::JobDescription, job_description_id)
        .await?;

    analyze_texts(generator, &resume.text, &job.text, policy).await
}
