use crate::metadata::PageMetadata;
use crate::scrap::ScrapResult;
use crate::Result;
use serde::Serialize;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Serialize a whole scrap
pub fn scrap_to_json(scrap: &ScrapResult, config: &JsonConfig) -> Result<String> {
    to_json(scrap, config.pretty)
}

/// Serialize only the page metadata
pub fn metadata_to_json(metadata: &PageMetadata, pretty: bool) -> Result<String> {
    to_json(metadata, pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, scrap: &ScrapResult) -> Result<String> {
        scrap_to_json(scrap, &self.config)
    }

    pub fn metadata_only(&self, metadata: &PageMetadata) -> Result<String> {
        metadata_to_json(metadata, self.config.pretty)
    }
}
