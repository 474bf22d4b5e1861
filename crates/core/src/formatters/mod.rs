pub mod header;
pub mod html;
pub mod json;
pub mod markdown;

pub use header::metadata_header;
pub use html::{BlankLine, EmptyInput, HtmlConfig, HtmlFormatter, convert_to_html, inline_format, to_html};
pub use json::{JsonConfig, JsonFormatter, metadata_to_json, scrap_to_json};
pub use markdown::{MarkdownConverter, MarkdownOptions, element_to_markdown, to_markdown};
