use crate::parse::Element;
use regex::Regex;
use std::sync::LazyLock;

/// Configuration for the fallback content score
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Points per `<p>` descendant
    pub paragraph_weight: f64,
    /// Points per `<h1>`..`<h6>` descendant
    pub heading_weight: f64,
    /// Multiplier applied to navigation-like elements
    pub navigation_penalty: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { paragraph_weight: 10.0, heading_weight: 5.0, navigation_penalty: 0.1 }
    }
}

/// Result of scoring an element
#[derive(Debug, Clone)]
pub struct ScoreResult {
    /// The element's tag name
    pub tag_name: String,
    /// Whitespace-separated words in the element's text
    pub word_count: usize,
    /// Number of `<p>` descendants
    pub paragraph_count: usize,
    /// Number of heading descendants
    pub heading_count: usize,
    /// Whether the navigation penalty was applied
    pub navigation_like: bool,
    /// Final calculated score
    pub final_score: f64,
}

/// Names that mark page chrome rather than content
static NAVIGATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(nav|menu|sidebar|header|footer|aside)").expect("navigation regex is valid"));

/// Count whitespace-separated words, the way a browser's `split(/\s+/)` would
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Word count of an element's plain text
pub fn word_count(element: &Element<'_>) -> usize {
    count_words(&element.text())
}

/// Whether an element looks like navigation or page chrome
///
/// Checks the tag name and the `class` and `role` attributes against
/// `nav|menu|sidebar|header|footer|aside`.
pub fn is_navigation_like(element: &Element<'_>) -> bool {
    if NAVIGATION_PATTERN.is_match(&element.tag_name()) {
        return true;
    }

    ["class", "role"]
        .iter()
        .filter_map(|name| element.attr(name))
        .any(|value| NAVIGATION_PATTERN.is_match(value))
}

/// Whether an element holds enough prose to be taken as the main content
///
/// Requires more than `min_words` words and no navigation-like naming.
pub fn has_substantial_content(element: &Element<'_>, min_words: usize) -> bool {
    word_count(element) > min_words && !is_navigation_like(element)
}

/// Calculate the fallback content score of a container
///
/// `words + paragraph_weight * paragraphs + heading_weight * headings`,
/// multiplied by `navigation_penalty` for navigation-like elements. The
/// penalty scales rather than excludes, so a very large nav-like wrapper
/// can still win.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let word_count = word_count(element);
    let paragraph_count = element.select("p").map(|found| found.len()).unwrap_or_default();
    let heading_count = element
        .select("h1, h2, h3, h4, h5, h6")
        .map(|found| found.len())
        .unwrap_or_default();
    let navigation_like = is_navigation_like(element);

    let raw_score = word_count as f64
        + config.paragraph_weight * paragraph_count as f64
        + config.heading_weight * heading_count as f64;
    let final_score = if navigation_like { raw_score * config.navigation_penalty } else { raw_score };

    ScoreResult { tag_name: element.tag_name(), word_count, paragraph_count, heading_count, navigation_like, final_score }
}
