// src/environment.rs
use crate::analysis::HeaderPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub max_page_bytes: u64,
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
            max_page_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub header_policy: HeaderPolicy,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("ATS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));
        info!(
            "Loading configuration for environment: {} from {}",
            environment,
            config_path.display()
        );

        let mut config = Self::load_from_file(&config_path, &environment)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn get_environment() -> String {
        std::env::var("ATS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found. Server cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse configuration YAML")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            database_path: Self::resolve_path(&env_config.database_path)?,
            log_file: env_config
                .log_file
                .as_ref()
                .map(Self::resolve_path)
                .transpose()?,
            ..env_config
        })
    }

    /// `ROCKET_PORT` or `PORT` take precedence over the file.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("ROCKET_PORT").or_else(|_| std::env::var("PORT")) {
            self.port = port
                .parse::<u16>()
                .with_context(|| format!("Port must be a valid port number, got '{}'", port))?;
        }
        Ok(())
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        let dirs = [
            self.database_path.parent(),
            self.log_file.as_deref().and_then(Path::parent),
        ];
        for dir in dirs.into_iter().flatten() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}
