use crate::Document;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Title used when a page offers nothing better
pub const UNTITLED: &str = "Untitled";

/// Date formats tried, in order, after RFC 3339
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%Y/%m/%d", "%Y.%m.%d"];

/// Metadata describing a clipped page
///
/// Every field has a fallback, so `title`, `url` and `site_name` are always
/// present; the optional fields are independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl Document {
    /// Extract title with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. `<title>` element
    /// 3. First `<h1>` element
    /// 4. `"Untitled"`
    pub fn extract_title(&self) -> String {
        self.get_meta_content("og:title")
            .or_else(|| self.title())
            .or_else(|| self.first_text(&["h1"]))
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Extract author with priority fallback:
    /// 1. Meta `author`
    /// 2. Text of `[rel="author"]`, `.author`, `.byline`, `[itemprop="author"]`
    pub fn extract_author(&self) -> Option<String> {
        self.get_meta_content("author")
            .or_else(|| self.first_text(&["[rel=\"author\"]", ".author", ".byline", "[itemprop=\"author\"]"]))
    }

    /// Extract the publication date, localized as `YYYY. M. D.`:
    /// 1. `<time datetime="">` attribute
    /// 2. Text of that `<time>` element
    /// 3. Meta `article:published_time`
    ///
    /// Returns `None` when no candidate parses as a date.
    pub fn extract_published_date(&self) -> Option<String> {
        let mut candidates = Vec::new();

        if let Some(time) = self.select_first("time[datetime]") {
            candidates.extend(time.attr("datetime").map(str::to_string));
            candidates.push(time.text());
        }
        candidates.extend(self.get_meta_content("article:published_time"));

        candidates.iter().find_map(|raw| parse_date(raw)).map(|date| localize_date(&date))
    }

    /// Extract description with priority fallback:
    /// 1. Open Graph `og:description`
    /// 2. Meta `description`
    pub fn extract_description(&self) -> Option<String> {
        self.get_meta_content("og:description")
            .or_else(|| self.get_meta_content("description"))
    }

    /// Extract site name with priority fallback:
    /// 1. Open Graph `og:site_name`
    /// 2. Host of the page URL
    /// 3. The page URL itself
    pub fn extract_site_name(&self) -> String {
        if let Some(site) = self.get_meta_content("og:site_name") {
            return site;
        }

        if let Some(host) = self.base_url().and_then(|url| url.host_str()) {
            return host.to_string();
        }

        self.source_url().unwrap_or_default().to_string()
    }

    /// Extract the favicon as an absolute URL
    ///
    /// Uses the first `icon` or `apple-touch-icon` link, falling back to
    /// `/favicon.ico` at the page origin. Relative hrefs stay as written when
    /// the page URL is unknown.
    pub fn extract_favicon(&self) -> Option<String> {
        let href = ["link[rel~=\"icon\"]", "link[rel=\"apple-touch-icon\"]"]
            .iter()
            .filter_map(|selector| self.select_first(selector))
            .find_map(|link| link.attr("href").map(str::trim).filter(|href| !href.is_empty()));

        match (self.base_url(), href) {
            (Some(base), Some(href)) => base.join(href).ok().map(String::from).or_else(|| Some(href.to_string())),
            (Some(base), None) => base.join("/favicon.ico").ok().map(String::from),
            (None, Some(href)) => Some(href.to_string()),
            (None, None) => None,
        }
    }

    /// Extract all metadata at once
    pub fn extract_metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.extract_title(),
            url: self.source_url().unwrap_or_default().to_string(),
            author: self.extract_author(),
            published_date: self.extract_published_date(),
            description: self.extract_description(),
            site_name: self.extract_site_name(),
            favicon: self.extract_favicon(),
        }
    }

    /// Get meta tag content by name or property attribute
    fn get_meta_content(&self, attr: &str) -> Option<String> {
        [format!("meta[property=\"{}\"]", attr), format!("meta[name=\"{}\"]", attr)]
            .iter()
            .filter_map(|selector| self.select_first(selector))
            .find_map(|el| non_empty(el.attr("content").unwrap_or_default()))
    }

    /// First non-empty trimmed text among the selectors, in selector order
    fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            self.select(selector)
                .unwrap_or_default()
                .iter()
                .find_map(|el| non_empty(&el.text()))
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

/// Parse the date formats commonly found in `datetime` attributes and bylines
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn localize_date(date: &NaiveDate) -> String {
    date.format("%Y. %-m. %-d.").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page Title</title>
            <meta name="author" content="John Doe">
            <meta name="description" content="This is a test description of the page.">
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <meta property="og:site_name" content="Example Site">
            <link rel="shortcut icon" href="/static/icon.png">
        </head>
        <body>
            <h1>Main Heading</h1>
            <p class="byline">By Someone Else</p>
            <time datetime="2024-01-15T10:30:00Z">January 15, 2024</time>
        </body>
        </html>
    "#;

    const HTML_WITHOUT_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><meta charset="UTF-8"></head>
        <body><p>This is a paragraph with some text content.</p></body>
        </html>
    "#;

    fn doc(html: &str) -> Document {
        Document::parse_with_url(html, "https://news.example.com/2024/story").unwrap()
    }

    #[test]
    fn test_open_graph_wins() {
        let metadata = doc(HTML_WITH_META).extract_metadata();

        assert_eq!(metadata.title, "OG Title");
        assert_eq!(metadata.description, Some("OG Description".to_string()));
        assert_eq!(metadata.site_name, "Example Site");
    }

    #[test]
    fn test_meta_author_beats_byline() {
        assert_eq!(doc(HTML_WITH_META).extract_author(), Some("John Doe".to_string()));
    }

    #[rstest]
    #[case(r#"<a rel="author" href="/u/jane">Jane Roe</a>"#, "Jane Roe")]
    #[case(r#"<span class="author"> Sam </span>"#, "Sam")]
    #[case(r#"<div class="byline">By Kim</div>"#, "By Kim")]
    #[case(r#"<span itemprop="author">Lee</span>"#, "Lee")]
    fn test_author_from_dom(#[case] body: &str, #[case] expected: &str) {
        let html = format!("<html><body>{body}</body></html>");
        assert_eq!(doc(&html).extract_author(), Some(expected.to_string()));
    }

    #[test]
    fn test_title_fallback_chain() {
        let with_title = "<html><head><title> Page </title></head><body><h1>Heading</h1></body></html>";
        assert_eq!(doc(with_title).extract_title(), "Page");

        let with_h1 = "<html><body><h1>  Heading  </h1></body></html>";
        assert_eq!(doc(with_h1).extract_title(), "Heading");

        assert_eq!(doc(HTML_WITHOUT_META).extract_title(), "Untitled");
    }

    #[test]
    fn test_metadata_fallback_totality() {
        let metadata = doc(HTML_WITHOUT_META).extract_metadata();

        assert_eq!(metadata.title, "Untitled");
        assert_eq!(metadata.url, "https://news.example.com/2024/story");
        assert_eq!(metadata.site_name, "news.example.com");
        assert_eq!(metadata.author, None);
        assert_eq!(metadata.published_date, None);
        assert_eq!(metadata.description, None);
        assert_eq!(metadata.favicon, Some("https://news.example.com/favicon.ico".to_string()));
    }

    #[test]
    fn test_site_name_without_valid_url() {
        let doc = Document::parse_with_url(HTML_WITHOUT_META, "local-file").unwrap();
        assert_eq!(doc.extract_site_name(), "local-file");
        assert_eq!(doc.extract_favicon(), None);
    }

    #[test]
    fn test_published_date_from_datetime_attribute() {
        assert_eq!(doc(HTML_WITH_META).extract_published_date(), Some("2024. 1. 15.".to_string()));
    }

    #[rstest]
    #[case(r#"<time datetime="not a date">March 20, 2024</time>"#, Some("2024. 3. 20."))]
    #[case(r#"<time datetime="2023-07-04">July</time>"#, Some("2023. 7. 4."))]
    #[case(r#"<time datetime="">soon</time>"#, None)]
    #[case(r#"<time>2024-01-01</time>"#, None)]
    fn test_published_date_parsing(#[case] body: &str, #[case] expected: Option<&str>) {
        let html = format!("<html><body>{body}</body></html>");
        assert_eq!(doc(&html).extract_published_date(), expected.map(str::to_string));
    }

    #[test]
    fn test_published_date_from_meta() {
        let html = r#"<html><head><meta property="article:published_time" content="2022-12-31T23:00:00+09:00"></head></html>"#;
        assert_eq!(doc(html).extract_published_date(), Some("2022. 12. 31.".to_string()));
    }

    #[test]
    fn test_favicon_resolved_against_page() {
        assert_eq!(
            doc(HTML_WITH_META).extract_favicon(),
            Some("https://news.example.com/static/icon.png".to_string())
        );
    }

    #[test]
    fn test_description_from_meta_name() {
        let html = r#"<html><head><meta name="description" content=" Plain description "></head></html>"#;
        assert_eq!(doc(html).extract_description(), Some("Plain description".to_string()));
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let metadata = doc(HTML_WITH_META).extract_metadata();
        let json = serde_json::to_string(&metadata).unwrap();

        assert!(json.contains(r#""siteName":"Example Site""#));
        assert!(json.contains(r#""publishedDate":"2024. 1. 15.""#));

        let bare = PageMetadata { title: "T".into(), url: "u".into(), site_name: "s".into(), ..Default::default() };
        let json = serde_json::to_string(&bare).unwrap();
        assert!(!json.contains("author"));
    }
}
