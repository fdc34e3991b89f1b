use anyhow::{Context, Result};
use ats_matcher::cli::{self, Cli};
use ats_matcher::EnvironmentConfig;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ats_matcher=info,rocket::server=off"))
}

/// Load the configuration under a console-only subscriber; the full
/// subscriber needs `log_file` from the configuration itself.
fn load_config<W>(make_writer: W) -> Result<EnvironmentConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().with_writer(make_writer));

    tracing::subscriber::with_default(bootstrap, || {
        EnvironmentConfig::load().map_err(|e| {
            error!("Failed to load configuration: {:#}", e);
            e
        })
    })
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let json_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Arc::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer())
        .with(json_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(std::io::stdout)?;
    if let Some(dir) = config.log_file.as_deref().and_then(Path::parent) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    init_tracing(config.log_file.as_deref())?;

    info!("Environment: {}", EnvironmentConfig::get_environment());
    info!("Server port: {}", config.port);

    cli::run(cli, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    // Both cases share one test because they set the same process-wide variable.
    #[test]
    fn test_config_loading_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "local:\n  database_path: data/ats.db\nproduction:\n  database_path: data/ats.db\n",
        )
        .unwrap();

        std::env::set_var("ATS_CONFIG", &path);
        let captured = Captured::default();
        let writer = captured.clone();
        let config = load_config(move || writer.clone()).unwrap();
        assert!(config.database_path.ends_with("data/ats.db"));
        assert!(captured.text().contains("Loading configuration"));

        std::env::set_var("ATS_CONFIG", dir.path().join("missing.yaml"));
        let captured = Captured::default();
        let writer = captured.clone();
        assert!(load_config(move || writer.clone()).is_err());
        assert!(captured.text().contains("Failed to load configuration"));

        std::env::remove_var("ATS_CONFIG");
    }
}
