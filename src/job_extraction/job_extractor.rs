// src/job_extraction/job_extractor.rs
use super::strategies::{
    first_accepted, long_enough, main_without_boilerplate, non_empty, COMPANY_STRATEGIES,
    DESCRIPTION_STRATEGIES, MIN_DESCRIPTION_CHARS, TITLE_STRATEGIES,
};
use super::{JobPosting, UNKNOWN_COMPANY, UNKNOWN_POSITION};
use crate::environment::ExtractorConfig;
use crate::error::{ExtractionError, FetchError};
use crate::utils::{capitalize_first, char_len};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA};
use reqwest::{redirect, Client, Url};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct JobExtractor {
    client: Client,
    max_page_bytes: u64,
}

impl JobExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_page_bytes: config.max_page_bytes,
        })
    }

    /// Fetch `url` and reduce the page to title, company and description.
    pub async fn extract(&self, url: &str) -> Result<JobPosting, ExtractionError> {
        let parsed = validate_url(url)?;
        info!("Fetching job post: {}", parsed);

        let html = self.fetch(&parsed).await?;
        debug!("Fetched {} bytes from {}", html.len(), parsed);

        let posting = parse_posting(&html, &parsed)?;
        info!(
            "Extracted job: {} at {} ({} chars)",
            posting.title,
            posting.company,
            char_len(&posting.description)
        );
        Ok(posting)
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Job post {} returned HTTP {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_page_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_page_bytes)
        {
            warn!("Job post {} declares a body above {} bytes", url, self.max_page_bytes);
            return Err(too_large());
        }

        // Content-Length can be missing, so the stream is capped as well.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })? {
            if body.len() as u64 + chunk.len() as u64 > self.max_page_bytes {
                warn!("Job post {} exceeded {} bytes while reading", url, self.max_page_bytes);
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Parse an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(parsed)
}

/// Reduce an already-fetched page to a `JobPosting`.
pub fn parse_posting(html: &str, url: &Url) -> Result<JobPosting, ExtractionError> {
    let document = Html::parse_document(html);

    let title = match first_accepted(&document, TITLE_STRATEGIES, non_empty) {
        Some((strategy, title)) => {
            debug!("Found title using {}: {}", strategy, title);
            title
        }
        None => UNKNOWN_POSITION.to_string(),
    };

    let company = match first_accepted(&document, COMPANY_STRATEGIES, non_empty) {
        Some((strategy, company)) => {
            debug!("Found company using {}: {}", strategy, company);
            company
        }
        None => company_from_host(url).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
    };

    let description = match first_accepted(&document, DESCRIPTION_STRATEGIES, long_enough) {
        Some((strategy, description)) => {
            debug!(
                "Found description using {} ({} chars)",
                strategy,
                char_len(&description)
            );
            description
        }
        None => {
            debug!("Trying fallback content extraction");
            main_without_boilerplate(&document).unwrap_or_default()
        }
    };

    if char_len(&description) < MIN_DESCRIPTION_CHARS {
        warn!(
            "Description too short or not found for {} ({} chars)",
            url,
            char_len(&description)
        );
        return Err(ExtractionError::InsufficientContent {
            url: url.to_string(),
        });
    }

    Ok(JobPosting {
        title,
        company,
        description,
    })
}

/// `https://www.acmejobs.com/...` -> `Acmejobs`
fn company_from_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next().filter(|label| !label.is_empty())?;
    let company = capitalize_first(label);
    debug!("Using domain-based company name: {}", company);
    Some(company)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const LONG_BODY: &str = "We are looking for a senior backend engineer to design, build and operate \
        the services behind our marketplace. You will work with Rust, PostgreSQL and Kafka.";

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn test_config() -> ExtractorConfig {
        ExtractorConfig {
            timeout_secs: 5,
            ..ExtractorConfig::default()
        }
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Answer every connection with the same raw HTTP response.
    async fn serve_always(raw_response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(raw_response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    /// Accept connections and never answer.
    async fn serve_silent() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_og_title_wins_over_title_tag_without_h1() {
        let html = format!(
            r#"<html><head><title>Jobs at Initech</title>
            <meta property="og:title" content="Site Reliability Engineer"></head>
            <body><article>{}</article></body></html>"#,
            LONG_BODY
        );
        let posting = parse_posting(&html, &url("https://initech.example/jobs/1")).unwrap();
        assert_eq!(posting.title, "Site Reliability Engineer");
    }

    #[test]
    fn test_company_derived_from_hostname() {
        let html = format!("<html><body><main>{}</main></body></html>", LONG_BODY);
        let posting = parse_posting(&html, &url("https://www.AcmeJobs.com/posting")).unwrap();
        assert_eq!(posting.company, "Acmejobs");
        assert_eq!(posting.title, UNKNOWN_POSITION);
    }

    #[test]
    fn test_short_selectors_fail_with_insufficient_content() {
        let html = r#"<html><head><title>Login</title></head><body>
            <div data-test="job-description">Sign in to view</div>
            <div class="job-description">Members only</div>
            <article>Log in</article>
            <main><p>Please authenticate</p><script>var x = "a very long tracking script body that is not content";</script></main>
            </body></html>"#;
        let err = parse_posting(html, &url("https://jobs.example.com/1")).unwrap_err();
        assert!(matches!(err, ExtractionError::InsufficientContent { .. }));
    }

    #[test]
    fn test_description_is_whitespace_normalized() {
        let html = format!(
            "<html><body><div class=\"description__text\">\n\n   {}   \n\n\n  <p>Benefits:   remote    first</p>\r\n\r\n</div></body></html>",
            LONG_BODY
        );
        let posting = parse_posting(&html, &url("https://www.linkedin.com/jobs/view/1")).unwrap();
        assert!(!posting.description.contains("  "));
        assert!(!posting.description.contains("\n\n"));
        assert!(posting.description.ends_with("Benefits: remote first"));
        assert_eq!(posting.company, "Linkedin");
    }

    #[test]
    fn test_main_selector_accepts_long_main() {
        let html = format!(
            r#"<html><body><main>
            <nav>Home | Jobs | About us and other navigation links that are long enough</nav>
            <section>{}</section>
            <footer>Copyright 2024 with enough trailing words to be noticed</footer>
            </main></body></html>"#,
            LONG_BODY
        );
        // `main` itself qualifies, so navigation text stays in; the stripped
        // fallback only runs when nothing qualifies.
        let posting = parse_posting(&html, &url("https://example.org/")).unwrap();
        assert!(posting.description.contains("senior backend engineer"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/job/1").is_ok());
        assert!(matches!(
            validate_url("not a url"),
            Err(ExtractionError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(ExtractionError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_fetches_and_parses() {
        let body = format!(
            r#"<html><body><h1>Rust Developer</h1><span class="employer-name">Hooli</span>
            <div data-test="job-description">{}</div></body></html>"#,
            LONG_BODY
        );
        let base = serve_once("200 OK", body).await;
        let extractor = JobExtractor::new(&test_config()).unwrap();

        let posting = extractor.extract(&format!("{}/jobs/42", base)).await.unwrap();
        assert_eq!(posting.title, "Rust Developer");
        assert_eq!(posting.company, "Hooli");
        assert_eq!(posting.file_name(), "Rust Developer - Hooli");
    }

    #[tokio::test]
    async fn test_extract_rejects_error_status() {
        let base = serve_once("404 Not Found", "gone".to_string()).await;
        let extractor = JobExtractor::new(&test_config()).unwrap();

        let err = extractor.extract(&format!("{}/missing", base)).await.unwrap_err();
        match err {
            ExtractionError::Fetch(FetchError::Status { status, .. }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_reports_connection_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let extractor = JobExtractor::new(&test_config()).unwrap();
        let err = extractor
            .extract(&format!("http://{}/job", addr))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch(FetchError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_a_fetch_error() {
        let base = serve_always(
            "HTTP/1.1 302 Found\r\nLocation: /loop\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;
        let extractor = JobExtractor::new(&test_config()).unwrap();

        let err = extractor
            .extract(&format!("{}/start", base))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch(FetchError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn test_unresponsive_server_times_out() {
        let base = serve_silent().await;
        let extractor = JobExtractor::new(&ExtractorConfig {
            timeout_secs: 1,
            ..ExtractorConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = extractor
            .extract(&format!("{}/job", base))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch(FetchError::Request { .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_declared_oversized_page_is_rejected() {
        let body = format!("<html><body><main>{}</main></body></html>", LONG_BODY);
        let base = serve_once("200 OK", body).await;
        let extractor = JobExtractor::new(&ExtractorConfig {
            max_page_bytes: 64,
            ..test_config()
        })
        .unwrap();

        let err = extractor.extract(&base).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch(FetchError::TooLarge { limit: 64, .. })
        ));
    }

    #[tokio::test]
    async fn test_undeclared_oversized_page_is_rejected() {
        let base = serve_always(format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><main>{}</main></body></html>",
            LONG_BODY
        ))
        .await;
        let extractor = JobExtractor::new(&ExtractorConfig {
            max_page_bytes: 64,
            ..test_config()
        })
        .unwrap();

        let err = extractor.extract(&base).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch(FetchError::TooLarge { .. })
        ));
    }
}
