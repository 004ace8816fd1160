//! Markdown rendering of HTML message bodies.
//!
//! Conversion is fallible and reported explicitly; callers that only want
//! the text use [`derive_markdown`], which maps failure to `None`.

use thiserror::Error;

/// Column width used when rendering HTML to text.
pub const MARKDOWN_WIDTH: usize = 80;

/// Errors from body conversion.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The HTML could not be rendered.
    #[error("html conversion failed: {0}")]
    Conversion(#[from] html2text::Error),
}

/// Render an HTML body as markdown-flavoured plain text.
///
/// Trailing whitespace is trimmed from the result.
pub fn html_to_markdown(html: &str) -> Result<String, ContentError> {
    let text = html2text::from_read(html.as_bytes(), MARKDOWN_WIDTH)?;
    Ok(text.trim_end().to_string())
}

/// Derive the markdown body for an optional HTML body.
///
/// Returns `None` when there is no HTML, when conversion fails, or when the
/// rendered text is empty.
pub fn derive_markdown(html: Option<&str>) -> Option<String> {
    let html = html?;
    match html_to_markdown(html) {
        Ok(text) if !text.is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraph_text() {
        let text = html_to_markdown("<p>School starts at nine.</p>").unwrap();
        assert_eq!(text, "School starts at nine.");
    }

    #[test]
    fn renders_emphasis_and_links_as_markdown() {
        let text = html_to_markdown(r#"<p><strong>Note</strong> <a href="https://x.test/">form</a></p>"#)
            .unwrap();
        assert!(text.contains("**Note**"));
        assert!(text.contains("form"));
        assert!(text.contains("https://x.test/"));
    }

    #[test]
    fn too_deep_nesting_fails() {
        let nested = format!("{}deep{}", "<blockquote>".repeat(60), "</blockquote>".repeat(60));

        assert!(html_to_markdown(&nested).is_err());
        assert_eq!(derive_markdown(Some(&nested)), None);
    }

    #[test]
    fn absent_html_has_no_markdown() {
        assert_eq!(derive_markdown(None), None);
    }

    #[test]
    fn empty_html_has_no_markdown() {
        assert_eq!(derive_markdown(Some("")), None);
        assert_eq!(derive_markdown(Some("<div></div>")), None);
    }

    #[test]
    fn present_html_has_markdown() {
        assert_eq!(
            derive_markdown(Some("<p>Hello</p>")).as_deref(),
            Some("Hello")
        );
    }
}
