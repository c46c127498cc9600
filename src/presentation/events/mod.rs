//! Event handling.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Redraw needed.
    Redraw,
    /// Exit application.
    Exit,
}

/// Terminal event classification.
pub struct EventHandler;

impl EventHandler {
    /// Returns the key of a press event.
    ///
    /// Release and repeat events reported by some terminals are skipped.
    #[must_use]
    pub fn key_press(event: &Event) -> Option<&KeyEvent> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => Some(key),
            _ => None,
        }
    }

    /// Checks if key is a quit event.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } | KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                ..
            }
        )
    }

    /// Checks if the terminal geometry changed.
    #[must_use]
    pub const fn is_resize_event(event: &Event) -> bool {
        matches!(event, Event::Resize(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test_case(KeyCode::Char('q'), KeyModifiers::NONE ; "q")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL ; "ctrl c")]
    #[test_case(KeyCode::Esc, KeyModifiers::NONE ; "escape")]
    fn test_quit_events(code: KeyCode, modifiers: KeyModifiers) {
        assert!(EventHandler::is_quit_event(&make_key_event(code, modifiers)));
    }

    #[test_case(KeyCode::Char('a'), KeyModifiers::NONE ; "letter")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::NONE ; "plain c")]
    #[test_case(KeyCode::Char('q'), KeyModifiers::CONTROL ; "ctrl q")]
    fn test_non_quit_events(code: KeyCode, modifiers: KeyModifiers) {
        assert!(!EventHandler::is_quit_event(&make_key_event(code, modifiers)));
    }

    #[test]
    fn test_key_press_skips_release() {
        let press = Event::Key(make_key_event(KeyCode::Char('j'), KeyModifiers::NONE));
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));

        assert!(EventHandler::key_press(&press).is_some());
        assert!(EventHandler::key_press(&release).is_none());
        assert!(EventHandler::is_resize_event(&Event::Resize(80, 24)));
    }
}
