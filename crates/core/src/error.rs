//! Error types for clipping operations.
//!
//! Almost everything in this crate degrades instead of failing: a page with no
//! detectable main content falls back to its cleaned body, missing metadata
//! falls back to defaults, and unknown markup is converted through its
//! children. [`ClipError`] therefore only covers genuine precondition
//! violations (selection-only clipping without a selection) and the I/O paths
//! used to obtain a page.
//!
//! # Example
//!
//! ```rust
//! use clipdown_core::{ClipError, ClipperOptions, Page, clip_page};
//!
//! let page = Page::new("<html><body><p>Hello</p></body></html>", "https://example.com/");
//! let options = ClipperOptions::builder().selection_only(true).build();
//!
//! match clip_page(&page, &options) {
//!     Err(ClipError::NoSelection) => println!("select some text first"),
//!     Err(e) => println!("Error: {}", e),
//!     Ok(scrap) => println!("{}", scrap.content),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clipping and conversion operations.
#[derive(Error, Debug)]
pub enum ClipError {
    /// Selection-only clipping was requested but nothing is selected.
    ///
    /// This is the one condition the clipper reports instead of degrading:
    /// an empty scrap would silently lose the user's intent.
    #[error("No text selected")]
    NoSelection,

    /// HTML parsing errors.
    ///
    /// Returned when a CSS selector is invalid or rewritten HTML cannot be
    /// turned back into text.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Serialization of a scrap failed.
    #[error("Failed to serialize scrap: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The fetched resource is not an HTML document.
    #[error("URL does not return HTML content (content type: {0})")]
    NotHtml(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Result type alias for ClipError.
pub type Result<T> = std::result::Result<T, ClipError>;
