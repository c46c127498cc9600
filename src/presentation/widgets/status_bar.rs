//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Severity of the feed message on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Bottom line: feed state, cache statistics and key hints.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    message: String,
    stats: String,
    hints: String,
    level: Option<StatusLevel>,
}

impl StatusBar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn left(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn center(mut self, stats: impl Into<String>) -> Self {
        self.stats = stats.into();
        self
    }

    #[must_use]
    pub fn right(mut self, hints: impl Into<String>) -> Self {
        self.hints = hints.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = Some(level);
        self
    }

    fn width_of(text: &str) -> u16 {
        u16::try_from(text.width()).unwrap_or(u16::MAX)
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let level = self.level.unwrap_or(StatusLevel::Info);
        let accent = Style::default()
            .fg(level.color())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(Color::DarkGray);

        // Hints give way first on narrow terminals.
        let hints_width = StatusBar::width_of(&self.hints);
        let hints_width = if hints_width + StatusBar::width_of(&self.message) < area.width {
            hints_width
        } else {
            0
        };

        let [message_area, stats_area, hints_area] = Layout::horizontal([
            Constraint::Length(StatusBar::width_of(&self.message)),
            Constraint::Fill(1),
            Constraint::Length(hints_width),
        ])
        .areas(area);

        Paragraph::new(self.message.as_str())
            .style(accent)
            .render(message_area, buf);
        Paragraph::new(self.stats.as_str())
            .style(muted)
            .alignment(Alignment::Center)
            .render(stats_area, buf);
        Paragraph::new(self.hints.as_str())
            .style(muted)
            .render(hints_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bar: &StatusBar, width: u16) -> (String, Buffer) {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        let line = (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        (line, buf)
    }

    #[test]
    fn test_segments_are_placed() {
        let bar = StatusBar::new().left("3 posts").center("mid").right("q quit");
        let (line, _) = rendered(&bar, 40);

        assert!(line.starts_with("3 posts"));
        assert!(line.ends_with("q quit"));
        assert!(line.contains("mid"));
    }

    #[test]
    fn test_hints_dropped_when_narrow() {
        let bar = StatusBar::new().left("Feed unavailable").right("j/k move  q quit");
        let (line, _) = rendered(&bar, 20);

        assert!(line.starts_with("Feed unavailable"));
        assert!(!line.contains("quit"));
    }

    #[test]
    fn test_level_colors_message() {
        let bar = StatusBar::new().left("offline").level(StatusLevel::Error);
        let (_, buf) = rendered(&bar, 10);
        assert_eq!(buf[(0, 0)].fg, Color::Red);
        assert_eq!(StatusLevel::Warning.color(), Color::Yellow);
    }
}
