pub mod clipper;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod metadata;
pub mod parse;
pub mod sanitize;
pub mod scoring;
pub mod scrap;

pub use clipper::{Clipper, ClipperOptions, ClipperOptionsBuilder, clip_page};
#[doc(hidden)]
pub use detect::{CONTENT_SELECTORS, DetectConfig, Detection};
pub use detect::{detect_main_content, detect_main_content_with_config};
pub use error::{ClipError, Result};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_page;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{BlankLine, EmptyInput, HtmlConfig, HtmlFormatter, JsonConfig, JsonFormatter};
pub use formatters::{MarkdownConverter, MarkdownOptions};
pub use formatters::{convert_to_html, element_to_markdown, metadata_header, scrap_to_json, to_html, to_markdown};
pub use metadata::PageMetadata;
pub use parse::{Document, Element};
pub use sanitize::{absolutize_urls, clean_html, remove_unwanted};
#[doc(hidden)]
pub use scoring::{ScoreConfig, ScoreResult, calculate_score, count_words, has_substantial_content};
pub use scrap::{OutputFormat, Page, ScrapResult};
