use ratatui::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const USER_PALETTE: &[Color] = &[
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
];

/// Picks a stable color for a username.
#[must_use]
pub fn username_color(username: &str) -> Color {
    let hash = username
        .bytes()
        .fold(0_usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    USER_PALETTE[hash % USER_PALETTE.len()]
}

/// Word-wraps `text` to `width` display columns.
///
/// Words wider than a line are split at character boundaries. Blank input
/// produces no lines.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_words() {
        let lines = wrap_text("Hello world this is a test", 10);
        assert_eq!(lines, vec!["Hello", "world this", "is a test"]);
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs() {
        let lines = wrap_text("first\n\nthird", 20);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_wide_chars() {
        let lines = wrap_text("日本語テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn test_wrap_text_blank() {
        assert!(wrap_text("", 10).is_empty());
        assert!(wrap_text("   \n ", 10).is_empty());
    }

    #[test]
    fn test_username_color_is_stable() {
        assert_eq!(username_color("orpheus"), username_color("orpheus"));
    }
}
