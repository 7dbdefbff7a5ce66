//! Visible-text extraction from HTML.

use scraper::{ElementRef, Html};

/// Elements whose content is never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Extract visible text from HTML bytes, one trimmed line per text line.
///
/// Invalid UTF-8 is replaced rather than rejected. Text under
/// `script`/`style`/`noscript` is dropped, and no output line is empty or
/// whitespace-only.
pub fn html_to_text(bytes: &[u8]) -> String {
    let html = String::from_utf8_lossy(bytes);
    let document = Html::parse_document(&html);

    let mut lines: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map(|el| SKIPPED_ELEMENTS.contains(&el.value().name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        lines.extend(text.lines().map(str::trim).filter(|line| !line.is_empty()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_styles() {
        let html = br#"
            <html>
              <head>
                <title>Travel Forecast</title>
                <style>body { color: red; }</style>
                <script>var tracking = "secret";</script>
              </head>
              <body>
                <noscript>Enable JavaScript</noscript>
                <h1>  Outlook  </h1>
                <p>Arrivals will reach <b>90 million</b> by 2026.</p>
              </body>
            </html>
        "#;

        let text = html_to_text(html);
        assert_eq!(
            text,
            "Travel Forecast\nOutlook\nArrivals will reach\n90 million\nby 2026."
        );
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
        assert!(!text.contains("JavaScript"));
    }

    #[test]
    fn test_no_blank_lines() {
        let html = b"<div>\n\n   <p>one</p>\n \t\n<p>\n  two  \n\n three</p></div>";
        let text = html_to_text(html);
        assert_eq!(text, "one\ntwo\nthree");
        assert!(text.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut html = b"<p>caf".to_vec();
        html.push(0xFF);
        html.extend_from_slice(b"</p><p>ok</p>");
        let text = html_to_text(&html);
        assert!(text.starts_with("caf"));
        assert!(text.ends_with("ok"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_text(b""), "");
        assert_eq!(html_to_text(b"<script>only()</script>"), "");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_to_text(b"line one\n  line two  "), "line one\nline two");
    }
}
