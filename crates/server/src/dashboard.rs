//! Per-bookmark icon presentation.
//!
//! Each rendered row starts from a placeholder glyph (first letter of the
//! title) and swaps it for the resolved inline image; an absent icon keeps
//! the placeholder and marks the row as failed.

use crate::bookmarks::Bookmark;

/// What a bookmark row shows in its icon slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSlot {
    /// Fallback glyph derived from the title.
    Placeholder(char),
    /// Resolved inline image (`data:` URL).
    Image(String),
}

/// Icon slot plus the failed styling marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBinding {
    pub slot: IconSlot,
    pub failed: bool,
}

/// Placeholder glyph for a title: its first letter, upper-cased.
pub fn placeholder_for(title: &str) -> char {
    title
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or('#')
}

/// Bind a resolution outcome to a row's icon slot.
pub fn bind(title: &str, resolved: Option<String>) -> IconBinding {
    match resolved {
        Some(data) => IconBinding { slot: IconSlot::Image(data), failed: false },
        None => IconBinding { slot: IconSlot::Placeholder(placeholder_for(title)), failed: true },
    }
}

/// One dashboard line for a bookmark and its icon binding.
pub fn render_line(bookmark: &Bookmark, binding: &IconBinding) -> String {
    let marker = if binding.failed { "!" } else { " " };
    match &binding.slot {
        IconSlot::Image(data) => format!(
            "{:>3}  [icon {:>6}B]{} {}  ({})",
            bookmark.key,
            data.len(),
            marker,
            bookmark.title,
            bookmark.url
        ),
        IconSlot::Placeholder(c) => {
            format!("{:>3}  [{}]{} {}  ({})", bookmark.key, c, marker, bookmark.title, bookmark.url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark() -> Bookmark {
        Bookmark { key: "g".into(), title: "github".into(), url: "https://github.com".into() }
    }

    #[test]
    fn test_placeholder_is_uppercased_first_letter() {
        assert_eq!(placeholder_for("github"), 'G');
        assert_eq!(placeholder_for("  docs  "), 'D');
        assert_eq!(placeholder_for("ärzte"), 'Ä');
    }

    #[test]
    fn test_placeholder_for_empty_title() {
        assert_eq!(placeholder_for(""), '#');
        assert_eq!(placeholder_for("   "), '#');
    }

    #[test]
    fn test_bind_success_swaps_placeholder() {
        let binding = bind("github", Some("data:image/png;base64,AA==".into()));
        assert_eq!(binding.slot, IconSlot::Image("data:image/png;base64,AA==".into()));
        assert!(!binding.failed);
    }

    #[test]
    fn test_bind_absent_keeps_placeholder_and_marks_failed() {
        let binding = bind("github", None);
        assert_eq!(binding.slot, IconSlot::Placeholder('G'));
        assert!(binding.failed);
    }

    #[test]
    fn test_render_line_failed_marker() {
        let line = render_line(&bookmark(), &bind("github", None));
        assert!(line.contains("[G]!"));
        assert!(line.contains("github"));
    }

    #[test]
    fn test_render_line_with_icon() {
        let line = render_line(&bookmark(), &bind("github", Some("data:image/png;base64,AA==".into())));
        assert!(line.contains("[icon"));
        assert!(!line.contains("]!"));
    }
}
