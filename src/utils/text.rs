//! Text truncation for bounded model input.

/// Marker appended where text was cut.
pub const TRUNCATION_MARKER: &str = "... [TRUNCATED] ...";

/// Collapse whitespace and cut `text` to at most `width` characters.
///
/// Whitespace runs become single spaces. If the collapsed text still exceeds
/// `width`, whole words are kept while they fit together with
/// [`TRUNCATION_MARKER`], and the marker is appended. When not even the first
/// word fits, only the marker is returned. A `width` narrower than the marker
/// keeps the first `width` characters of the collapsed text with no marker.
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if width < marker_len {
        return collapsed.chars().take(width).collect();
    }

    let mut kept = String::new();
    let mut kept_len = 0;

    for word in words {
        let word_len = word.chars().count();
        let sep = usize::from(kept_len > 0);
        if kept_len + sep + word_len + marker_len > width {
            break;
        }
        if sep == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
        kept_len += sep + word_len;
    }

    kept.push_str(TRUNCATION_MARKER);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_only_collapsed() {
        assert_eq!(shorten("a  b\n\nc\t d", 100), "a b c d");
        assert_eq!(shorten("", 10), "");
    }

    #[test]
    fn test_long_text_cut_at_word_boundary() {
        let text = "Visitor arrivals are expected to reach ninety million by 2026";
        let out = shorten(text, 40);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(out.chars().count() <= 40);
        assert_eq!(out, format!("Visitor arrivals are{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_first_word_too_long_yields_marker() {
        let out = shorten("supercalifragilisticexpialidocious rest", 25);
        assert_eq!(out, TRUNCATION_MARKER);
    }

    #[test]
    fn test_width_below_marker_length_is_hard_cut() {
        let text = "Visitor arrivals are expected to grow";
        assert_eq!(shorten(text, 10), "Visitor ar");
        assert_eq!(shorten(text, 0), "");
        for width in 0..TRUNCATION_MARKER.chars().count() {
            assert!(shorten(text, width).chars().count() <= width);
        }
        assert_eq!(shorten("short", 10), "short");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "été ".repeat(20);
        let out = shorten(&text, 30);
        assert!(out.chars().count() <= 30);
        assert!(out.starts_with("été"));
    }
}
