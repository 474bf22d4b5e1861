//! Page loading from URLs, files, and stdin.
//!
//! Everything here produces a [`Page`] (or its HTML) for the synchronous
//! clipping pipeline. Network access needs the `fetch` feature.

use std::fs;
use std::path::PathBuf;

use crate::{ClipError, Result};

#[cfg(feature = "fetch")]
use {crate::scrap::Page, reqwest::Client, std::time::Duration, url::Url};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; Clipdown/0.1)".to_string(),
            max_redirects: 10,
        }
    }
}

/// Fetches a page over HTTP(S).
///
/// Redirects are followed and the returned page carries the final URL, so
/// relative links resolve against where the document actually lives.
///
/// # Errors
///
/// [`ClipError::InvalidUrl`] for anything but an absolute http(s) URL,
/// [`ClipError::Timeout`] when the request exceeds the configured timeout,
/// [`ClipError::NotHtml`] when the server declares a non-HTML content type.
#[cfg(feature = "fetch")]
pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<Page> {
    let parsed_url = Url::parse(url).map_err(|e| ClipError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(ClipError::InvalidUrl(format!("unsupported scheme: {}", parsed_url.scheme())));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(ClipError::HttpError)?;

    tracing::debug!(%parsed_url, "fetching page");

    let response = client
        .get(parsed_url)
        .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| if e.is_timeout() { ClipError::Timeout { timeout: config.timeout } } else { ClipError::HttpError(e) })?
        .error_for_status()?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = content_type
        && !is_html_content_type(&content_type)
    {
        return Err(ClipError::NotHtml(content_type));
    }

    let final_url = response.url().to_string();
    let html = response.text().await?;

    Ok(Page::new(html, final_url))
}

/// Whether a `Content-Type` value names an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(ClipError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(ClipError::from)
    }
}

/// Reads content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.contains("Clipdown"));
    }

    #[cfg(feature = "fetch")]
    #[rstest]
    #[case("not-a-url")]
    #[case("ftp://example.com/file.html")]
    #[case("file:///etc/hosts")]
    fn test_fetch_page_rejects_invalid_urls(#[case] url: &str) {
        let config = FetchConfig::default();
        let url = url.to_string();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_page(&url, &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(ClipError::InvalidUrl(_))));
    }

    #[rstest]
    #[case("text/html", true)]
    #[case("text/html; charset=utf-8", true)]
    #[case("Text/HTML", true)]
    #[case("application/xhtml+xml", true)]
    #[case("application/pdf", false)]
    #[case("text/plain", false)]
    fn test_is_html_content_type(#[case] content_type: &str, #[case] expected: bool) {
        assert_eq!(is_html_content_type(content_type), expected);
    }

    #[test]
    fn test_fetch_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<p>saved</p>").unwrap();

        let html = fetch_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(html, "<p>saved</p>");
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(ClipError::FileNotFound(_))));
    }
}
