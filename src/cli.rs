// src/cli.rs
use crate::analysis::{parse_analysis, HeaderPolicy};
use crate::database::Database;
use crate::environment::EnvironmentConfig;
use crate::job_extraction::JobExtractor;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ats-matcher")]
#[command(about = "Compare resumes against job descriptions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Fetch a job posting and print the extracted fields as JSON
    Extract { url: String },
    /// Split a saved analysis into sections and print them as JSON
    Parse {
        file: PathBuf,
        /// Only accept the six canonical section titles as headers
        #[arg(long)]
        canonical: bool,
    },
    /// Create the database and run migrations
    InitDb,
}

pub async fn run(cli: Cli, config: EnvironmentConfig) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,

        Command::Extract { url } => {
            let extractor = JobExtractor::new(&config.extractor)?;
            let posting = extractor.extract(&url).await?;
            println!("{}", serde_json::to_string_pretty(&posting)?);
            Ok(())
        }

        Command::Parse { file, canonical } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let policy = if canonical {
                HeaderPolicy::Canonical
            } else {
                config.analysis.header_policy
            };
            let parsed = parse_analysis(&text, policy)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }

        Command::InitDb => {
            config.ensure_directories().await?;
            let db = Database::connect(&config.database_path).await?;
            db.migrate().await?;
            info!("Database ready at {}", config.database_path.display());
            Ok(())
        }
    }
}
