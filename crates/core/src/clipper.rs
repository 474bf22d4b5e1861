//! Clip orchestration.
//!
//! This module ties the pipeline together: metadata extraction, main content
//! detection (with the cleaned-body fallback), URL absolutization,
//! sanitization, Markdown conversion and the optional metadata header. The
//! main entry points are [`clip_page`] and the [`Clipper`] struct.
//!
//! # Example
//!
//! ```rust
//! use clipdown_core::{Clipper, ClipperOptions, Page};
//!
//! let page = Page::new(
//!     "<html><head><title>Notes</title></head><body><p>Short note.</p></body></html>",
//!     "https://example.com/notes",
//! );
//! let clipper = Clipper::with_options(ClipperOptions::builder().include_metadata(false).build());
//! let scrap = clipper.clip(&page).unwrap();
//!
//! assert_eq!(scrap.content, "Short note.");
//! assert_eq!(scrap.metadata.title, "Notes");
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::detect::detect_main_content;
use crate::formatters::header::metadata_header;
use crate::formatters::markdown::{MarkdownConverter, MarkdownOptions};
use crate::parse::Document;
use crate::sanitize::{absolutize_urls, clean_html, remove_unwanted};
use crate::scrap::{Page, ScrapResult};
use crate::{ClipError, Result};

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_page};

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline regex is valid"));

/// Options controlling a clip.
///
/// Every option is independent. Deserializes from camelCase JSON with a
/// default for each missing field.
///
/// # Example
///
/// ```rust
/// use clipdown_core::ClipperOptions;
///
/// let options = ClipperOptions::builder()
///     .preserve_images(false)
///     .selection_only(true)
///     .build();
/// assert!(options.include_metadata);
/// assert!(!options.preserve_images);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClipperOptions {
    /// Prepend the metadata header to the content (default: true).
    pub include_metadata: bool,

    /// Keep images as `![alt](src)` (default: true).
    pub preserve_images: bool,

    /// Keep links as `[text](href)` (default: true).
    pub preserve_links: bool,

    /// Sanitize the content HTML before conversion (default: true).
    pub clean_html: bool,

    /// Clip only the current selection (default: false).
    pub selection_only: bool,
}

impl Default for ClipperOptions {
    fn default() -> Self {
        Self { include_metadata: true, preserve_images: true, preserve_links: true, clean_html: true, selection_only: false }
    }
}

impl ClipperOptions {
    /// Creates a new builder for ClipperOptions.
    pub fn builder() -> ClipperOptionsBuilder {
        ClipperOptionsBuilder::new()
    }

    fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions { preserve_images: self.preserve_images, preserve_links: self.preserve_links }
    }
}

/// Builder for ClipperOptions.
pub struct ClipperOptionsBuilder {
    options: ClipperOptions,
}

impl ClipperOptionsBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { options: ClipperOptions::default() }
    }

    /// Sets whether to prepend the metadata header.
    pub fn include_metadata(mut self, value: bool) -> Self {
        self.options.include_metadata = value;
        self
    }

    /// Sets whether to keep images.
    pub fn preserve_images(mut self, value: bool) -> Self {
        self.options.preserve_images = value;
        self
    }

    /// Sets whether to keep links.
    pub fn preserve_links(mut self, value: bool) -> Self {
        self.options.preserve_links = value;
        self
    }

    /// Sets whether to sanitize the content HTML.
    pub fn clean_html(mut self, value: bool) -> Self {
        self.options.clean_html = value;
        self
    }

    /// Sets whether to clip only the selection.
    pub fn selection_only(mut self, value: bool) -> Self {
        self.options.selection_only = value;
        self
    }

    /// Builds the options.
    pub fn build(self) -> ClipperOptions {
        self.options
    }
}

impl Default for ClipperOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clip a page with the given options, stamped with the current time.
///
/// # Errors
///
/// Returns [`ClipError::NoSelection`] when `selection_only` is set and the
/// page has no non-collapsed selection. Nothing else fails: pages without a
/// recognizable article are clipped from their cleaned body.
pub fn clip_page(page: &Page, options: &ClipperOptions) -> Result<ScrapResult> {
    Clipper::with_options(options.clone()).clip(page)
}

/// Main entry point for clipping.
#[derive(Debug, Clone, Default)]
pub struct Clipper {
    options: ClipperOptions,
}

impl Clipper {
    /// Creates a clipper with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipper with custom options.
    pub fn with_options(options: ClipperOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClipperOptions {
        &self.options
    }

    /// Clips a page, stamped with the current time.
    pub fn clip(&self, page: &Page) -> Result<ScrapResult> {
        self.clip_at(page, Utc::now())
    }

    /// Clips a page with an explicit clip time.
    ///
    /// Output is fully determined by the page, the options and `now`.
    pub fn clip_at(&self, page: &Page, now: DateTime<Utc>) -> Result<ScrapResult> {
        let doc = Document::parse_with_url(&page.html, &page.url)?;
        let metadata = doc.extract_metadata();
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut html = self.content_html(page, &doc)?;
        if let Some(base_url) = doc.base_url() {
            html = absolutize_urls(&html, base_url);
        }
        if self.options.clean_html {
            html = clean_html(&html);
        }

        let markdown = MarkdownConverter::new(self.options.markdown_options()).convert(&html);
        let body = normalize_markdown(&markdown);

        let content = if self.options.include_metadata {
            metadata_header(&metadata, &timestamp) + &body
        } else {
            body
        };

        tracing::debug!(url = %page.url, title = %metadata.title, chars = content.len(), "clipped page");

        Ok(ScrapResult { content, metadata, selection_only: self.options.selection_only, timestamp })
    }

    /// Fetches a page over HTTP and clips it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_clip(&self, url: &str, config: &FetchConfig) -> Result<ScrapResult> {
        let page = fetch_page(url, config).await?;
        self.clip(&page)
    }

    /// The HTML to convert: the selection, the main content, or the cleaned body
    fn content_html(&self, page: &Page, doc: &Document) -> Result<String> {
        if self.options.selection_only {
            return page.selection().map(str::to_string).ok_or(ClipError::NoSelection);
        }

        if let Some(main) = detect_main_content(doc) {
            return Ok(main.outer_html());
        }

        tracing::debug!(url = %page.url, "no main content found, clipping cleaned body");
        let body = doc.body().map(|body| body.outer_html()).unwrap_or_else(|| doc.as_string());
        Ok(remove_unwanted(&body))
    }
}

/// Collapse runs of blank lines and trim the converted body
fn normalize_markdown(markdown: &str) -> String {
    EXCESS_NEWLINES.replace_all(markdown, "\n\n").trim().to_string()
}
