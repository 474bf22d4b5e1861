use std::{env, fs, path::PathBuf};

fn input_arg() -> clap::Arg {
    clap::arg!(<INPUT> "URL to fetch, local file, or '-' for stdin")
}

fn output_arg() -> clap::Arg {
    clap::arg!(-o --output <FILE> "Output file (default: stdout)")
        .value_name("FILE")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let clip = clap::Command::new("clip")
        .about("Clip a page: detect its main content and convert it to Markdown")
        .arg(input_arg())
        .arg(clap::arg!(--url <URL> "Page URL used for metadata and link resolution"))
        .arg(
            clap::arg!(--selection <FILE> "File holding the serialized selection HTML")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--selection_only "Clip only the selection"))
        .arg(clap::arg!(--no_metadata "Omit the metadata header"))
        .arg(clap::arg!(--no_images "Drop images from the output"))
        .arg(clap::arg!(--no_links "Keep link text but drop link targets"))
        .arg(clap::arg!(--raw "Skip HTML sanitization before conversion"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (markdown, json)")
                .default_value("markdown")
                .value_parser(["markdown", "md", "json"]),
        )
        .arg(clap::arg!(--pretty "Pretty print JSON output"))
        .arg(output_arg())
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"));

    let markdown = clap::Command::new("markdown")
        .about("Convert an HTML fragment or document to Markdown")
        .arg(input_arg())
        .arg(output_arg());

    let html = clap::Command::new("html")
        .about("Convert Markdown to HTML")
        .arg(input_arg())
        .arg(clap::arg!(--blank_as_break "Render blank lines as <br> instead of <p><br></p>"))
        .arg(clap::arg!(--empty_as_nothing "Render empty input as nothing instead of <p></p>"))
        .arg(output_arg());

    let completions = clap::Command::new("completions")
        .about("Generate a shell completion script")
        .arg(clap::arg!(<SHELL> "Target shell").value_parser(["bash", "elvish", "fish", "powershell", "zsh"]));

    let mut cmd = clap::Command::new("clipdown")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Clip web pages to Markdown")
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand_required(true)
        .subcommands([clip, markdown, html, completions]);

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "clipdown", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "clipdown", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "clipdown", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "clipdown", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
