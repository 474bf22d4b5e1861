use owo_colors::OwoColorize;

use clipdown_core::{PageMetadata, ScrapResult};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Clipdown".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Clip web pages to Markdown\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a labelled detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print the metadata found on a clipped page
pub fn print_metadata(metadata: &PageMetadata) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Page Metadata".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    print_detail("Title", &metadata.title);
    print_detail("Site", &metadata.site_name);
    if let Some(author) = &metadata.author {
        print_detail("Author", author);
    }
    if let Some(date) = &metadata.published_date {
        print_detail("Published", date);
    }
    if let Some(favicon) = &metadata.favicon {
        print_detail("Favicon", favicon);
    }
    eprintln!();
}

/// Print a short summary of a scrap
pub fn print_scrap_summary(scrap: &ScrapResult) {
    print_detail("Clipped at", &scrap.timestamp);
    print_detail("Selection only", if scrap.selection_only { "Yes" } else { "No" });
    print_detail("Content", &format_size(scrap.content.len()));
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }
}
