mod echo;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use clipdown_core::{
    BlankLine, Clipper, ClipperOptions, EmptyInput, FetchConfig, HtmlConfig, JsonConfig, OutputFormat, Page,
    convert_to_html, fetch_file, fetch_stdin, to_markdown,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::echo::{
    format_size, print_banner, print_detail, print_info, print_metadata, print_scrap_summary, print_step,
    print_success, print_timing,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page URL used when the input has no address of its own
const BLANK_URL: &str = "about:blank";

/// Output format for clipped content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Format(OutputFormat);

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self(OutputFormat::Markdown)),
            "json" => Ok(Self(OutputFormat::Json)),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, json", s)),
        }
    }
}

/// Clip web pages to Markdown and convert Markdown back to HTML
#[derive(Parser, Debug)]
#[command(name = "clipdown")]
#[command(version)]
#[command(about = "Clip web pages to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clip a page: detect its main content and convert it to Markdown
    Clip(ClipArgs),
    /// Convert an HTML fragment or document to Markdown
    Markdown(MarkdownArgs),
    /// Convert Markdown to HTML
    Html(HtmlArgs),
    /// Generate a shell completion script
    Completions {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ClipArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Page URL used for metadata and link resolution (default: the input's own URL)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// File holding the serialized selection HTML
    #[arg(long, value_name = "FILE")]
    selection: Option<PathBuf>,

    /// Clip only the selection
    #[arg(long)]
    selection_only: bool,

    /// Omit the metadata header
    #[arg(long)]
    no_metadata: bool,

    /// Drop images from the output
    #[arg(long)]
    no_images: bool,

    /// Keep link text but drop link targets
    #[arg(long)]
    no_links: bool,

    /// Skip HTML sanitization before conversion
    #[arg(long)]
    raw: bool,

    /// Output format (markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: Format,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,
}

#[derive(Args, Debug)]
struct MarkdownArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct HtmlArgs {
    /// Local Markdown file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Render blank lines as <br> instead of <p><br></p>
    #[arg(long)]
    blank_as_break: bool,

    /// Render empty input as nothing instead of <p></p>
    #[arg(long)]
    empty_as_nothing: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Content read from the command line input
struct Input {
    content: String,
    /// Address of the content, when it has one
    url: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "clipdown=debug,clipdown_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read from stdin, a URL or a file
async fn read_input(input: &str, fetch_config: &FetchConfig, verbose: bool) -> anyhow::Result<Input> {
    tracing::debug!(input, "reading input");

    if input == "-" {
        if verbose {
            print_step(1, 3, "Reading from stdin");
        }
        let content = fetch_stdin().context("Failed to read from stdin")?;
        return Ok(Input { content, url: None });
    }

    if is_remote(input) {
        if verbose {
            print_step(1, 3, &format!("Fetching from {}", input.bright_white().underline()));
        }
        return fetch_remote(input, fetch_config).await;
    }

    if verbose {
        print_step(1, 3, &format!("Reading from file {}", input.bright_white()));
    }
    let content = fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?;
    Ok(Input { content, url: file_url(Path::new(input)) })
}

#[cfg(feature = "fetch")]
async fn fetch_remote(input: &str, fetch_config: &FetchConfig) -> anyhow::Result<Input> {
    let page = clipdown_core::fetch_page(input, fetch_config).await.context("Failed to fetch URL")?;
    Ok(Input { content: page.html, url: Some(page.url) })
}

#[cfg(not(feature = "fetch"))]
async fn fetch_remote(input: &str, _fetch_config: &FetchConfig) -> anyhow::Result<Input> {
    anyhow::bail!("Cannot fetch {}: clipdown was built without the `fetch` feature", input)
}

/// `file://` URL of a local path, so relative links in saved pages resolve
fn file_url(path: &Path) -> Option<String> {
    let absolute = fs::canonicalize(path).ok()?;
    Url::from_file_path(absolute).ok().map(String::from)
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            if content.ends_with('\n') {
                print!("{}", content);
            } else {
                println!("{}", content);
            }
        }
    }

    Ok(())
}

async fn run_clip(args: ClipArgs, verbose: bool) -> anyhow::Result<()> {
    let fetch_config = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
        ..Default::default()
    };

    let started = Instant::now();
    let input = read_input(&args.input, &fetch_config, verbose).await?;
    if verbose {
        print_detail("Size", &format_size(input.content.len()));
        print_timing("Read", started.elapsed());
        eprintln!();
    }

    let url = args.url.clone().or(input.url).unwrap_or_else(|| BLANK_URL.to_string());
    let mut page = Page::new(input.content, url);
    if let Some(path) = &args.selection {
        let selection =
            fs::read_to_string(path).with_context(|| format!("Failed to read selection: {}", path.display()))?;
        page = page.with_selection(selection);
    }

    let options = ClipperOptions::builder()
        .include_metadata(!args.no_metadata)
        .preserve_images(!args.no_images)
        .preserve_links(!args.no_links)
        .clean_html(!args.raw)
        .selection_only(args.selection_only)
        .build();

    if verbose {
        print_step(2, 3, "Clipping page");
    }

    let started = Instant::now();
    let scrap = Clipper::with_options(options).clip(&page).context("Failed to clip page")?;

    if verbose {
        print_timing("Clip", started.elapsed());
        print_metadata(&scrap.metadata);
        print_step(3, 3, "Writing output");
        print_scrap_summary(&scrap);
        print_detail("Format", &format!("{:?}", args.format.0));
        eprintln!();
    }

    let json_config = JsonConfig { pretty: args.pretty };
    let output = scrap.to_format(args.format.0, &json_config).context("Failed to render scrap")?;
    write_output(args.output.as_deref(), &output)
}

async fn run_markdown(args: MarkdownArgs, verbose: bool) -> anyhow::Result<()> {
    let input = read_input(&args.input, &FetchConfig::default(), verbose).await?;

    if verbose {
        print_step(2, 3, "Converting HTML to Markdown");
    }
    let markdown = to_markdown(&input.content);

    if verbose {
        print_step(3, 3, "Writing output");
    }
    write_output(args.output.as_deref(), &markdown)
}

async fn run_html(args: HtmlArgs, verbose: bool) -> anyhow::Result<()> {
    let input = read_input(&args.input, &FetchConfig::default(), verbose).await?;

    let config = HtmlConfig {
        empty_input: if args.empty_as_nothing { EmptyInput::Nothing } else { EmptyInput::EmptyParagraph },
        blank_line: if args.blank_as_break { BlankLine::LineBreak } else { BlankLine::EmptyParagraph },
    };

    if verbose {
        print_step(2, 3, "Converting Markdown to HTML");
    }
    let html = convert_to_html(&input.content, &config);

    if verbose {
        print_step(3, 3, "Writing output");
    }
    write_output(args.output.as_deref(), &html)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    match cli.command {
        Command::Clip(args) => run_clip(args, cli.verbose).await,
        Command::Markdown(args) => run_markdown(args, cli.verbose).await,
        Command::Html(args) => run_html(args, cli.verbose).await,
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "clipdown", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("md"), Ok(Format(OutputFormat::Markdown)));
        assert_eq!(Format::from_str("JSON"), Ok(Format(OutputFormat::Json)));
        assert!(Format::from_str("toml").is_err());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com"));
        assert!(is_remote("http://example.com"));
        assert!(!is_remote("page.html"));
        assert!(!is_remote("-"));
    }

    #[test]
    fn test_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.html");
        fs::write(&path, "<p>x</p>").unwrap();

        let url = file_url(&path).unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("/saved.html"));
        assert_eq!(file_url(Path::new("/nonexistent/file.html")), None);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["clipdown", "clip", "page.html", "--no-links", "-f", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Clip(args) => {
                assert!(args.no_links);
                assert_eq!(args.format, Format(OutputFormat::Json));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["clipdown", "render", "x"]).is_err());
        assert!(Cli::try_parse_from(["clipdown", "completions", "zsh"]).is_ok());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
