//! HTML cleanup before Markdown conversion.
//!
//! Two strategies live here and are used on different paths:
//!
//! - [`clean_html`] strips executable and presentational noise (scripts,
//!   styles, comments, presentation attributes, empty elements) from any
//!   fragment about to be converted.
//! - [`remove_unwanted`] drops whole page-chrome subtrees (navigation,
//!   headers, footers, ads, comment threads, related posts) and is used when
//!   no main content element was found and the entire body is clipped.
//!
//! Both run on `lol_html`'s streaming tokenizer rather than on raw string
//! patterns, so quoted attribute values containing `>` cannot confuse them.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

/// Attributes removed by [`clean_html`]; everything else (`href`, `src`, `datetime`, ...) survives
pub const STRIPPED_ATTRIBUTES: &[&str] = &["class", "id", "style", "onclick", "onload"];

/// Page chrome removed by [`remove_unwanted`]
pub const UNWANTED_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "nav",
    "header",
    "footer",
    "aside",
    ".ad",
    ".ads",
    ".advert",
    ".advertisement",
    "[id^=\"ad-\"]",
    ".comments",
    "#comments",
    ".comment-section",
    ".related",
    ".related-posts",
    ".share",
    ".social-share",
];

/// Elements that carry meaning even without content
const KEEP_WHEN_EMPTY: &[&str] = &[
    "td", "th", "tr", "iframe", "video", "audio", "canvas", "textarea", "object", "html", "head", "body",
];

/// An opening tag followed by a closing tag with only whitespace between.
/// The names are compared by the caller; the pattern stays linear-time on any input.
static EMPTY_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)(?:\s[^<>]*)?>\s*</([a-zA-Z][a-zA-Z0-9-]*)\s*>")
        .expect("empty element regex is valid")
});

/// Clean an HTML fragment for conversion.
///
/// Applied in order: `<script>`/`<style>` elements are removed with their
/// content, comments are removed, the attributes in [`STRIPPED_ATTRIBUTES`]
/// are dropped, and elements left empty are removed. The whole sequence is
/// repeated until nothing changes, so the result is stable:
/// `clean_html(&clean_html(x)) == clean_html(x)`.
///
/// # Example
///
/// ```rust
/// use clipdown_core::sanitize::clean_html;
///
/// let html = r#"<div class="x"><script>track()</script><p style="color:red">Hi</p><span> </span></div>"#;
/// assert_eq!(clean_html(html), "<div><p>Hi</p></div>");
/// ```
pub fn clean_html(html: &str) -> String {
    let mut current = html.to_string();

    // Every pass that changes the input removes at least one token, so this terminates.
    loop {
        let next = remove_empty_elements(&strip_noise(&current));
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Remove scripts, styles, comments and presentation attributes
fn strip_noise(html: &str) -> String {
    rewrite(
        html,
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("style", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("*", |el| {
                    for name in STRIPPED_ATTRIBUTES {
                        if el.has_attribute(name) {
                            el.remove_attribute(name);
                        }
                    }
                    Ok(())
                }),
            ],
            document_content_handlers: vec![lol_html::doc_comments!(|comment| {
                comment.remove();
                Ok(())
            })],
            ..Default::default()
        },
    )
}

/// Remove empty elements until none remain
fn remove_empty_elements(html: &str) -> String {
    let mut result = html.to_string();

    loop {
        let next = EMPTY_ELEMENT
            .replace_all(&result, |caps: &Captures| {
                let tag = caps[1].to_ascii_lowercase();
                if !tag.eq_ignore_ascii_case(&caps[2]) || KEEP_WHEN_EMPTY.contains(&tag.as_str()) {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned();

        if next == result {
            return result;
        }
        result = next;
    }
}

/// Remove page chrome subtrees from a body clone.
///
/// Everything matching [`UNWANTED_SELECTORS`] is removed together with its
/// content; the rest of the markup is passed through untouched.
///
/// # Example
///
/// ```rust
/// use clipdown_core::sanitize::remove_unwanted;
///
/// let html = r#"<body><nav>Home</nav><p>Story</p><div class="related-posts">More</div></body>"#;
/// assert_eq!(remove_unwanted(html), "<body><p>Story</p></body>");
/// ```
pub fn remove_unwanted(html: &str) -> String {
    let handlers = UNWANTED_SELECTORS
        .iter()
        .map(|selector| {
            lol_html::element!(selector, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    rewrite(html, lol_html::Settings { element_content_handlers: handlers, ..Default::default() })
}

/// Convert relative link and image URLs to absolute ones
pub fn absolutize_urls(html: &str, base_url: &Url) -> String {
    rewrite(
        html,
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href")
                        && !href.starts_with('#')
                        && let Ok(absolute) = base_url.join(&href)
                    {
                        el.set_attribute("href", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
                lol_html::element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src")
                        && let Ok(absolute) = base_url.join(&src)
                    {
                        el.set_attribute("src", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
            ],
            ..Default::default()
        },
    )
}

/// Run a streaming rewrite, handing back the input unchanged if it fails
fn rewrite(html: &str, settings: lol_html::Settings<'_, '_>) -> String {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(settings, |c: &[u8]| output.extend_from_slice(c));

    if let Err(e) = rewriter.write(html.as_bytes()) {
        tracing::debug!(error = %e, "html rewrite failed, keeping input");
        return html.to_string();
    }
    if let Err(e) = rewriter.end() {
        tracing::debug!(error = %e, "html rewrite failed, keeping input");
        return html.to_string();
    }

    match String::from_utf8(output) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
