use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading regex is valid"));
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(.*)$").expect("ordered item regex is valid"));
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+(.*)$").expect("unordered item regex is valid"));
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{3,}$").expect("rule regex is valid"));

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex is valid"));
static ITALIC: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"(?<!\*)\*([^*]+)\*(?!\*)").expect("italic regex is valid")
});
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").expect("underline regex is valid"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").expect("strike regex is valid"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code regex is valid"));
// Destinations may hold one level of balanced parentheses, as in `Rust_(language)`
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(((?:[^()\s]|\([^()\s]*\))+)\)").expect("image regex is valid")
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(((?:[^()\s]|\([^()\s]*\))+)\)").expect("link regex is valid")
});

/// URL schemes that run script when followed
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:"];

/// Output for input with no content at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyInput {
    /// An empty string
    Nothing,
    /// `<p></p>`, so an editor still has a block to place the caret in
    #[default]
    EmptyParagraph,
}

/// Output for each blank line between blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankLine {
    /// `<p><br></p>`
    #[default]
    EmptyParagraph,
    /// `<br>`
    LineBreak,
}

/// Configuration for Markdown to HTML conversion
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    pub empty_input: EmptyInput,
    pub blank_line: BlankLine,
}

/// The block currently open while scanning lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    UnorderedList,
    OrderedList,
    Quote,
    Code,
}

impl Block {
    fn open_tag(self) -> &'static str {
        match self {
            Block::None => "",
            Block::UnorderedList => "<ul>",
            Block::OrderedList => "<ol>",
            Block::Quote => "<blockquote>",
            Block::Code => "<pre><code>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            Block::None => "",
            Block::UnorderedList => "</ul>",
            Block::OrderedList => "</ol>",
            Block::Quote => "</blockquote>",
            Block::Code => "</code></pre>",
        }
    }
}

/// Convert Markdown to HTML with the default configuration
///
/// # Example
///
/// ```rust
/// use clipdown_core::to_html;
///
/// assert_eq!(to_html(""), "<p></p>");
/// assert_eq!(to_html("# Hi\n**bold**"), "<h1>Hi</h1><p><strong>bold</strong></p>");
/// assert_eq!(to_html("- a\n1. b"), "<ul><li>a</li></ul><ol><li>b</li></ol>");
/// ```
pub fn to_html(markdown: &str) -> String {
    convert_to_html(markdown, &HtmlConfig::default())
}

/// Convert Markdown to HTML in a single line-oriented pass
///
/// At most one block (a list, a quote or a fenced code block) is open at a
/// time; a line of a different kind closes it before its own output.
pub fn convert_to_html(markdown: &str, config: &HtmlConfig) -> String {
    if markdown.trim().is_empty() {
        return match config.empty_input {
            EmptyInput::Nothing => String::new(),
            EmptyInput::EmptyParagraph => "<p></p>".to_string(),
        };
    }

    let mut scanner = LineScanner { output: String::with_capacity(markdown.len() * 2), block: Block::None };
    for line in markdown.split('\n') {
        scanner.line(line.strip_suffix('\r').unwrap_or(line), config);
    }
    scanner.enter(Block::None);
    scanner.output
}

struct LineScanner {
    output: String,
    block: Block,
}

impl LineScanner {
    /// Switch to `block`, closing whatever was open if it differs
    fn enter(&mut self, block: Block) {
        if self.block == block {
            return;
        }
        self.output.push_str(self.block.close_tag());
        self.output.push_str(block.open_tag());
        self.block = block;
    }

    fn line(&mut self, line: &str, config: &HtmlConfig) {
        let trimmed = line.trim();

        if self.block == Block::Code {
            if trimmed.starts_with("```") {
                self.enter(Block::None);
            } else {
                self.output.push_str(&html_escape::encode_text(line));
                self.output.push('\n');
            }
            return;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len();
            self.enter(Block::None);
            self.output.push_str(&format!("<h{level}>{}</h{level}>", inline_format(caps[2].trim())));
            return;
        }

        if let Some(info) = trimmed.strip_prefix("```") {
            self.enter(Block::None);
            let info = info.trim();
            if info.is_empty() {
                self.enter(Block::Code);
            } else {
                self.output.push_str(&format!(
                    "<pre><code class=\"language-{}\">",
                    html_escape::encode_double_quoted_attribute(info)
                ));
                self.block = Block::Code;
            }
            return;
        }

        if RULE.is_match(trimmed) {
            self.enter(Block::None);
            self.output.push_str("<hr>");
            return;
        }

        if let Some(quoted) = trimmed.strip_prefix('>') {
            self.enter(Block::Quote);
            let quoted = quoted.trim();
            if !quoted.is_empty() {
                self.output.push_str(&format!("<p>{}</p>", inline_format(quoted)));
            }
            return;
        }

        if let Some(caps) = ORDERED_ITEM.captures(line) {
            self.enter(Block::OrderedList);
            self.output.push_str(&format!("<li>{}</li>", inline_format(caps[1].trim())));
            return;
        }

        if let Some(caps) = UNORDERED_ITEM.captures(line) {
            self.enter(Block::UnorderedList);
            self.output.push_str(&format!("<li>{}</li>", inline_format(caps[1].trim())));
            return;
        }

        self.enter(Block::None);
        if trimmed.is_empty() {
            self.output.push_str(match config.blank_line {
                BlankLine::EmptyParagraph => "<p><br></p>",
                BlankLine::LineBreak => "<br>",
            });
        } else {
            self.output.push_str(&format!("<p>{}</p>", inline_format(trimmed)));
        }
    }
}

/// Escape text and apply inline formatting
///
/// Passes run in a fixed order: bold, italic, underline, strikethrough,
/// inline code, image, link. Bold must run before italic so that `**` is
/// consumed first; the italic pattern refuses to touch a lone `*` next to
/// another `*`.
pub fn inline_format(text: &str) -> String {
    let escaped = html_escape::encode_text(text);

    let html = BOLD.replace_all(&escaped, "<strong>${1}</strong>");
    let html = italicize(&html);
    let html = UNDERLINE.replace_all(&html, "<u>${1}</u>");
    let html = STRIKE.replace_all(&html, "<del>${1}</del>");
    let html = CODE.replace_all(&html, "<code>${1}</code>");
    let html = IMAGE.replace_all(&html, |caps: &regex::Captures| {
        if runs_script(&caps[2]) {
            return quote_attribute(&caps[1]);
        }
        format!(r#"<img src="{}" alt="{}">"#, quote_attribute(&caps[2]), quote_attribute(&caps[1]))
    });
    let html = LINK.replace_all(&html, |caps: &regex::Captures| {
        if runs_script(&caps[2]) {
            return caps[1].to_string();
        }
        format!(r#"<a href="{}">{}</a>"#, quote_attribute(&caps[2]), &caps[1])
    });

    html.into_owned()
}

/// Apply the italic pass, leaving the text as is when the matcher hits its backtrack limit
fn italicize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for caps in ITALIC.captures_iter(text) {
        let caps = match caps {
            Ok(caps) => caps,
            Err(e) => {
                tracing::debug!(error = %e, chars = text.len(), "skipping italic pass");
                return text.to_string();
            }
        };
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            output.push_str(&text[last..whole.start()]);
            output.push_str("<em>");
            output.push_str(inner.as_str());
            output.push_str("</em>");
            last = whole.end();
        }
    }

    output.push_str(&text[last..]);
    output
}

fn runs_script(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    SCRIPT_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Escape double quotes in already text-escaped content placed in an attribute
fn quote_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Markdown to HTML formatter with a fixed configuration
pub struct HtmlFormatter {
    config: HtmlConfig,
}

impl HtmlFormatter {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, markdown: &str) -> String {
        convert_to_html(markdown, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::markdown::to_markdown;
    use rstest::rstest;

    #[test]
    fn test_empty_input_variants() {
        assert_eq!(to_html(""), "<p></p>");
        assert_eq!(to_html("  \n "), "<p></p>");

        let config = HtmlConfig { empty_input: EmptyInput::Nothing, ..Default::default() };
        assert_eq!(convert_to_html("", &config), "");
    }

    #[rstest]
    #[case("# One", "<h1>One</h1>")]
    #[case("## Two", "<h2>Two</h2>")]
    #[case("### Three", "<h3>Three</h3>")]
    #[case("###### Six", "<h6>Six</h6>")]
    #[case("####### Seven", "<p>####### Seven</p>")]
    #[case("#hashtag", "<p>#hashtag</p>")]
    fn test_headings(#[case] markdown: &str, #[case] expected: &str) {
        assert_eq!(to_html(markdown), expected);
    }

    #[test]
    fn test_list_type_switching() {
        let html = to_html("- a\n1. b\n- c");
        assert_eq!(html, "<ul><li>a</li></ul><ol><li>b</li></ol><ul><li>c</li></ul>");
    }

    #[test]
    fn test_list_continues_across_items() {
        assert_eq!(to_html("* x\n- y\n  - z"), "<ul><li>x</li><li>y</li><li>z</li></ul>");
        assert_eq!(to_html("1. a\n2. b\n10. c"), "<ol><li>a</li><li>b</li><li>c</li></ol>");
    }

    #[test]
    fn test_blank_line_variants() {
        assert_eq!(to_html("a\n\nb"), "<p>a</p><p><br></p><p>b</p>");

        let config = HtmlConfig { blank_line: BlankLine::LineBreak, ..Default::default() };
        assert_eq!(convert_to_html("- a\n\nb", &config), "<ul><li>a</li></ul><br><p>b</p>");
    }

    #[test]
    fn test_heading_closes_list() {
        assert_eq!(to_html("- a\n# H"), "<ul><li>a</li></ul><h1>H</h1>");
    }

    #[test]
    fn test_fenced_code_block() {
        let html = to_html("```rust\nlet x = a < b && **c**;\n\n```\nafter");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = a &lt; b &amp;&amp; **c**;\n\n</code></pre><p>after</p>"
        );
    }

    #[test]
    fn test_unterminated_fence_is_closed() {
        assert_eq!(to_html("```\ncode"), "<pre><code>code\n</code></pre>");
    }

    #[test]
    fn test_quote_and_rule() {
        assert_eq!(to_html("> a\n>\n> *b*\n---\nc"), "<blockquote><p>a</p><p><em>b</em></p></blockquote><hr><p>c</p>");
    }

    #[rstest]
    #[case("**bold**", "<strong>bold</strong>")]
    #[case("*it*", "<em>it</em>")]
    #[case("__under__", "<u>under</u>")]
    #[case("~~gone~~", "<del>gone</del>")]
    #[case("`a < b`", "<code>a &lt; b</code>")]
    #[case("**a*b*c**", "<strong>a<em>b</em>c</strong>")]
    #[case("a * b", "a * b")]
    #[case("[site](https://example.com/?a=1&b=2)", r#"<a href="https://example.com/?a=1&amp;b=2">site</a>"#)]
    #[case("![logo](https://example.com/l.png)", r#"<img src="https://example.com/l.png" alt="logo">"#)]
    #[case("<script>x</script>", "&lt;script&gt;x&lt;/script&gt;")]
    #[case("[Rust](https://en.wikipedia.org/wiki/Rust_(language))", r#"<a href="https://en.wikipedia.org/wiki/Rust_(language)">Rust</a>"#)]
    #[case("[x](javascript:alert(1))", "x")]
    #[case("[x](JavaScript:void)", "x")]
    #[case("![pic](vbscript:run)", "pic")]
    fn test_inline_format(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(inline_format(text), expected);
    }

    #[test]
    fn test_long_line_with_unmatched_star() {
        let line = format!("*{}", "a ".repeat(200_000));
        let html = to_html(&line);

        assert!(html.starts_with("<p>*a a "));
        assert!(html.ends_with("a</p>"));
    }

    #[test]
    fn test_italic_after_long_prefix() {
        let line = format!("{}*end*", "word ".repeat(10_000));
        assert!(inline_format(&line).ends_with("word <em>end</em>"));
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(to_html("# T\r\nbody\r\n"), "<h1>T</h1><p>body</p><p><br></p>");
    }

    #[test]
    fn test_round_trip_structure() {
        let markdown = "# Title\n\n## Section\n\n- a\n- b\n\n1. x\n2. y\n\n**bold** and *it* and __u__ and `code` and [link](https://example.com)";
        assert_eq!(to_markdown(&to_html(markdown)).trim_end(), markdown);
    }

    #[test]
    fn test_round_trip_quote_code_rule() {
        let markdown = "> quoted *text*\n\n```\nfn main() {}\n```\n\n---\n\nend";
        let back = to_markdown(&to_html(markdown));

        assert!(back.contains("> quoted *text*"));
        assert!(back.contains("```\nfn main() {}\n```"));
        assert!(back.contains("---"));
        assert!(back.trim_end().ends_with("end"));
    }

    #[test]
    fn test_formatter_uses_config() {
        let formatter = HtmlFormatter::new(HtmlConfig { empty_input: EmptyInput::Nothing, blank_line: BlankLine::LineBreak });
        assert_eq!(formatter.convert(""), "");
        assert_eq!(formatter.convert("a\n\nb"), "<p>a</p><br><p>b</p>");
    }
}
