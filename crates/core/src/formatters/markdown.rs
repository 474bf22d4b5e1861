use crate::parse::{Document, Element};
use scraper::{ElementRef, Node};

/// Deepest element the converter descends into; deeper subtrees emit their text
pub const MAX_DEPTH: usize = 256;

/// Tags whose content never reaches the output
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Configuration for Markdown conversion
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Emit `![alt](src)` for images; images are dropped otherwise
    pub preserve_images: bool,
    /// Emit `[text](href)` for links; only the link text is kept otherwise
    pub preserve_links: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self { preserve_images: true, preserve_links: true }
    }
}

/// Convert an HTML fragment to Markdown with default options
///
/// # Example
///
/// ```rust
/// use clipdown_core::to_markdown;
///
/// assert_eq!(to_markdown("<p></p><h1>Title</h1>"), "# Title\n\n");
/// assert_eq!(to_markdown("<ul><li>a</li><li>b</li></ul>"), "- a\n- b\n\n");
/// ```
pub fn to_markdown(html: &str) -> String {
    MarkdownConverter::default().convert(html)
}

/// Convert an already-parsed element (and its subtree) to Markdown with default options
pub fn element_to_markdown(element: &Element<'_>) -> String {
    MarkdownConverter::default().convert_element(element)
}

/// HTML to Markdown converter
///
/// A recursive depth-first walk over the parsed tree. Tags without a rule are
/// transparent: only their children are emitted.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: MarkdownOptions,
}

impl MarkdownConverter {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Parse `html` as a fragment and convert every top-level node
    pub fn convert(&self, html: &str) -> String {
        let doc = Document::parse_fragment(html);
        let mut buffer = String::new();
        self.render_children(doc.root().element_ref(), 0, &mut buffer);
        buffer
    }

    /// Convert an element together with its own tag
    pub fn convert_element(&self, element: &Element<'_>) -> String {
        let mut buffer = String::new();
        self.render_element(element.element_ref(), 0, &mut buffer);
        buffer
    }

    fn render_children(&self, element: ElementRef<'_>, depth: usize, buffer: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => push_collapsed(text, buffer),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.render_element(child, depth + 1, buffer);
                    }
                }
                _ => {}
            }
        }
    }

    fn render_element(&self, element: ElementRef<'_>, depth: usize, buffer: &mut String) {
        let name = element.value().name();

        if SKIPPED_TAGS.contains(&name) {
            return;
        }

        if depth > MAX_DEPTH {
            tracing::trace!(depth, tag = name, "markdown depth limit reached, emitting text");
            push_collapsed(&element.text().collect::<String>(), buffer);
            return;
        }

        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.render_heading(element, level, depth, buffer);
            }
            "p" => self.render_paragraph(element, depth, buffer),
            "ul" => self.render_list(element, false, 0, depth, buffer),
            "ol" => self.render_list(element, true, 0, depth, buffer),
            "blockquote" => self.render_blockquote(element, depth, buffer),
            "pre" => render_preformatted(element, buffer),
            "code" => render_inline_code(element, buffer),
            "hr" => {
                start_block(buffer);
                buffer.push_str("---\n\n");
            }
            "br" => buffer.push('\n'),
            "strong" | "b" => self.render_wrapped(element, "**", depth, buffer),
            "em" | "i" => self.render_wrapped(element, "*", depth, buffer),
            "u" => self.render_wrapped(element, "__", depth, buffer),
            "del" | "s" | "strike" => self.render_wrapped(element, "~~", depth, buffer),
            "a" => self.render_link(element, depth, buffer),
            "img" => self.render_image(element, buffer),
            _ => self.render_children(element, depth, buffer),
        }
    }

    fn render_heading(&self, element: ElementRef<'_>, level: usize, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        self.render_children(element, depth, &mut inner);
        let text = fold_lines(&inner);
        if text.is_empty() {
            return;
        }

        start_block(buffer);
        buffer.push_str(&"#".repeat(level));
        buffer.push(' ');
        buffer.push_str(&text);
        buffer.push_str("\n\n");
    }

    fn render_paragraph(&self, element: ElementRef<'_>, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        self.render_children(element, depth, &mut inner);
        let text = inner.trim();
        if text.is_empty() {
            return;
        }

        start_block(buffer);
        buffer.push_str(text);
        buffer.push_str("\n\n");
    }

    /// Render `ul`/`ol` items at the given nesting level
    ///
    /// Only the outermost list ends with a blank line; nested lists follow
    /// their parent item directly, indented two spaces per level.
    fn render_list(&self, element: ElementRef<'_>, ordered: bool, level: usize, depth: usize, buffer: &mut String) {
        let mut index = 1;
        for child in element.children().filter_map(ElementRef::wrap) {
            if child.value().name() != "li" {
                self.render_element(child, depth + 1, buffer);
                continue;
            }

            if level == 0 && index == 1 {
                start_block(buffer);
            }
            let marker = if ordered { format!("{}. ", index) } else { "- ".to_string() };
            self.render_list_item(child, &marker, level, depth + 1, buffer);
            index += 1;
        }

        // an itemless list leaves no trace
        if level == 0 && index > 1 {
            buffer.push('\n');
        }
    }

    fn render_list_item(&self, item: ElementRef<'_>, marker: &str, level: usize, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        let mut nested = String::new();

        for child in item.children() {
            match child.value() {
                Node::Text(text) => push_collapsed(text, &mut inner),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else { continue };
                    match child.value().name() {
                        "ul" if depth < MAX_DEPTH => self.render_list(child, false, level + 1, depth + 1, &mut nested),
                        "ol" if depth < MAX_DEPTH => self.render_list(child, true, level + 1, depth + 1, &mut nested),
                        _ => self.render_element(child, depth + 1, &mut inner),
                    }
                }
                _ => {}
            }
        }

        buffer.push_str(&"  ".repeat(level));
        buffer.push_str(marker);
        buffer.push_str(&fold_lines(&inner));
        buffer.push('\n');
        buffer.push_str(&nested);
    }

    fn render_blockquote(&self, element: ElementRef<'_>, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        self.render_children(element, depth, &mut inner);
        let text = inner.trim();
        if text.is_empty() {
            return;
        }

        start_block(buffer);
        buffer.push_str("> ");
        buffer.push_str(&text.replace('\n', "\n> "));
        buffer.push_str("\n\n");
    }

    /// Wrap trimmed inline content in `mark`, keeping surrounding whitespace outside the marks
    fn render_wrapped(&self, element: ElementRef<'_>, mark: &str, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        self.render_children(element, depth, &mut inner);
        self.push_inline(element, &inner, |content, out| {
            out.push_str(mark);
            out.push_str(content);
            out.push_str(mark);
        }, buffer);
    }

    fn render_link(&self, element: ElementRef<'_>, depth: usize, buffer: &mut String) {
        let mut inner = String::new();
        self.render_children(element, depth, &mut inner);

        let href = element.value().attr("href").map(str::trim).unwrap_or_default();
        if !self.options.preserve_links || href.is_empty() {
            self.push_inline(element, &inner, |content, out| out.push_str(content), buffer);
            return;
        }

        self.push_inline(element, &inner, |content, out| {
            out.push('[');
            out.push_str(content);
            out.push_str("](");
            out.push_str(href);
            out.push(')');
        }, buffer);
    }

    fn render_image(&self, element: ElementRef<'_>, buffer: &mut String) {
        if !self.options.preserve_images {
            return;
        }

        let src = element.value().attr("src").map(str::trim).unwrap_or_default();
        if src.is_empty() {
            return;
        }

        let alt = element.value().attr("alt").unwrap_or_default();
        buffer.push_str("![");
        buffer.push_str(alt.trim());
        buffer.push_str("](");
        buffer.push_str(src);
        buffer.push(')');
    }

    /// Emit inline content, writing nothing but the collapsed whitespace when it is empty
    fn push_inline(
        &self, element: ElementRef<'_>, inner: &str, wrap: impl FnOnce(&str, &mut String), buffer: &mut String,
    ) {
        let text: String = element.text().collect();
        let content = inner.trim();

        if text.starts_with(char::is_whitespace) {
            push_collapsed(" ", buffer);
        }
        if content.is_empty() {
            return;
        }

        wrap(content, buffer);
        if text.ends_with(char::is_whitespace) || inner.ends_with(char::is_whitespace) {
            push_collapsed(" ", buffer);
        }
    }
}

/// Fenced block from the raw text content; nested `<code>` contributes its text unescaped
fn render_preformatted(element: ElementRef<'_>, buffer: &mut String) {
    let text: String = element.text().collect();
    if text.trim().is_empty() {
        return;
    }

    start_block(buffer);
    buffer.push_str("```\n");
    buffer.push_str(text.trim_end_matches('\n'));
    buffer.push_str("\n```\n\n");
}

fn render_inline_code(element: ElementRef<'_>, buffer: &mut String) {
    let text: String = element.text().collect();
    if text.is_empty() {
        return;
    }

    buffer.push('`');
    buffer.push_str(&text);
    buffer.push('`');
}

/// Append text with whitespace runs collapsed to one space
///
/// Whitespace is dropped entirely at the start of the buffer or after
/// existing whitespace, so block boundaries never gain stray spaces.
fn push_collapsed(text: &str, buffer: &mut String) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !buffer.is_empty() && !buffer.ends_with(char::is_whitespace) {
                buffer.push(' ');
            }
        } else {
            buffer.push(ch);
        }
    }
}

/// Separate a block from inline text that precedes it
fn start_block(buffer: &mut String) {
    if !buffer.is_empty() && !buffer.ends_with('\n') {
        buffer.push_str("\n\n");
    }
}

/// Join the non-empty trimmed lines of `text` with single spaces
fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
