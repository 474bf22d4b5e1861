//! Main content detection.
//!
//! Finding the article body is a tagged-priority search: an ordered list of
//! selectors is tried first, semantic tags before class/id conventions, and
//! the first match with substantial content wins even when a larger generic
//! container exists. Only when no rule accepts an element does the scoring
//! fallback scan every container on the page.

use crate::parse::{Document, Element};
use crate::scoring::{ScoreConfig, calculate_score, has_substantial_content};

/// Selectors for likely content containers, in priority order
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    "main",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    "#content",
    ".main-content",
    ".post-body",
    ".article-body",
    ".markdown-body",
    ".post",
    ".story-body",
];

/// Tags scanned by the scoring fallback
const FALLBACK_TAGS: &str = "div, section, article, main";

/// Configuration for main content detection
#[derive(Debug, Clone)]
pub struct DetectConfig {
    /// Selectors tried in order before falling back to scoring
    pub selectors: Vec<String>,
    /// A selector match needs strictly more words than this
    pub min_words: usize,
    /// A scored container needs strictly more points than this
    pub min_score: f64,
    /// Weights for the scoring fallback
    pub score: ScoreConfig,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            selectors: CONTENT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            min_words: 50,
            min_score: 100.0,
            score: ScoreConfig::default(),
        }
    }
}

/// How the main content element was found
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Accepted by the selector at this index of the rule list
    Selector(usize),
    /// Chosen by the scoring fallback with this score
    Scored(f64),
}

/// Find the main content element with the default configuration
///
/// Returns `None` when neither a selector rule nor the scoring fallback finds
/// a candidate; callers then extract from the cleaned `<body>` instead.
pub fn detect_main_content(doc: &Document) -> Option<Element<'_>> {
    detect_main_content_with_config(doc, &DetectConfig::default()).map(|(element, _)| element)
}

/// Find the main content element and report which rule picked it
pub fn detect_main_content_with_config<'a>(
    doc: &'a Document, config: &DetectConfig,
) -> Option<(Element<'a>, Detection)> {
    if let Some((index, element)) = match_selectors(doc, config) {
        tracing::debug!(selector = %config.selectors[index], "main content matched selector");
        return Some((element, Detection::Selector(index)));
    }

    let (element, score) = best_scored_container(doc, config)?;
    tracing::debug!(tag = %element.tag_name(), score, "main content chosen by score");
    Some((element, Detection::Scored(score)))
}

/// First element, in selector order then document order, with substantial content
fn match_selectors<'a>(doc: &'a Document, config: &DetectConfig) -> Option<(usize, Element<'a>)> {
    for (index, selector) in config.selectors.iter().enumerate() {
        let elements = match doc.select(selector) {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!(%selector, error = %e, "skipping content selector");
                continue;
            }
        };

        if let Some(element) = elements
            .into_iter()
            .find(|element| has_substantial_content(element, config.min_words))
        {
            return Some((index, element));
        }
    }

    None
}

/// Highest-scoring container above the threshold, earliest on ties
fn best_scored_container<'a>(doc: &'a Document, config: &DetectConfig) -> Option<(Element<'a>, f64)> {
    let mut best: Option<(Element<'a>, f64)> = None;

    for element in doc.select(FALLBACK_TAGS).unwrap_or_default() {
        let result = calculate_score(&element, &config.score);
        tracing::trace!(tag = %result.tag_name, score = result.final_score, "scored container");

        if result.final_score <= config.min_score {
            continue;
        }
        if best.as_ref().is_none_or(|(_, top)| result.final_score > *top) {
            best = Some((element, result.final_score));
        }
    }

    best
}
