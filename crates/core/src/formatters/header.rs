use crate::metadata::PageMetadata;

/// Build the Markdown metadata header placed before clipped content
///
/// The title heading comes first, then the author, date and description
/// lines when known, the source link and the clip time, and finally a
/// horizontal rule. The result ends with a blank line so the body can follow
/// directly.
///
/// # Example
///
/// ```rust
/// use clipdown_core::PageMetadata;
/// use clipdown_core::formatters::header::metadata_header;
///
/// let metadata = PageMetadata {
///     title: "Example".into(),
///     url: "https://example.com/".into(),
///     site_name: "example.com".into(),
///     ..Default::default()
/// };
/// let header = metadata_header(&metadata, "2024-01-01T00:00:00.000Z");
/// assert!(header.starts_with("# Example\n\n**출처**: [https://example.com/](https://example.com/)\n"));
/// assert!(header.ends_with("\n---\n\n"));
/// ```
pub fn metadata_header(metadata: &PageMetadata, timestamp: &str) -> String {
    let mut header = format!("# {}\n\n", metadata.title);

    if let Some(author) = &metadata.author {
        header.push_str(&format!("**작성자**: {}\n", author));
    }

    if let Some(date) = &metadata.published_date {
        header.push_str(&format!("**게시일**: {}\n", date));
    }

    if let Some(description) = &metadata.description {
        header.push_str(&format!("**설명**: {}\n", description));
    }

    header.push_str(&format!("**출처**: [{url}]({url})\n", url = metadata.url));
    header.push_str(&format!("**스크랩 시간**: {}\n", timestamp));
    header.push_str("\n---\n\n");

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_header() {
        let metadata = PageMetadata {
            title: "Example".to_string(),
            url: "https://example.com/post".to_string(),
            author: Some("Jane".to_string()),
            published_date: Some("2024. 3. 9.".to_string()),
            description: Some("A post".to_string()),
            site_name: "example.com".to_string(),
            favicon: None,
        };

        assert_eq!(
            metadata_header(&metadata, "2024-03-10T08:00:00.000Z"),
            "# Example\n\n\
             **작성자**: Jane\n\
             **게시일**: 2024. 3. 9.\n\
             **설명**: A post\n\
             **출처**: [https://example.com/post](https://example.com/post)\n\
             **스크랩 시간**: 2024-03-10T08:00:00.000Z\n\
             \n---\n\n"
        );
    }

    #[test]
    fn test_optional_lines_are_independent() {
        let metadata = PageMetadata {
            title: "Only date".to_string(),
            url: "u".to_string(),
            published_date: Some("2020. 1. 1.".to_string()),
            site_name: "u".to_string(),
            ..Default::default()
        };
        let header = metadata_header(&metadata, "t");

        assert!(!header.contains("작성자"));
        assert!(!header.contains("설명"));
        assert!(header.starts_with("# Only date\n\n**게시일**: 2020. 1. 1.\n**출처**"));
    }
}
