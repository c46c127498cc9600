//! Main application orchestrator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use super::feed_screen::{FeedKeyResult, FeedScreen, FeedScreenState, FeedSettings, FeedStatus};
use crate::application::LoadFeedUseCase;
use crate::domain::entities::Post;
use crate::domain::ports::{FeedPort, ImageFetchPort};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::image::{CompletionReceiver, LoaderContext, MemoryImageCache};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::widgets::{ImageManager, StatusBar, StatusLevel};

/// Refresh period for relative timestamps.
const CLOCK_TICK_RATE: Duration = Duration::from_secs(30);

const KEY_HINTS: &str = "j/k move  g/G jump  r reload  q quit";

#[derive(Debug)]
enum Action {
    FeedLoaded(Vec<Post>),
    FeedUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Exiting,
}

pub struct App {
    state: AppState,
    screen: FeedScreenState,
    load_feed: Arc<LoadFeedUseCase>,
    cache: Arc<MemoryImageCache>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    completions: CompletionReceiver,
}

impl App {
    #[must_use]
    pub fn new(
        feed_port: Arc<dyn FeedPort>,
        fetcher: Arc<dyn ImageFetchPort>,
        cache: Arc<MemoryImageCache>,
        config: &AppConfig,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let context = LoaderContext::new(fetcher, completion_tx).with_cache(cache.clone());

        Self {
            state: AppState::Running,
            screen: FeedScreenState::new(context, FeedSettings::from_config(config)),
            load_feed: Arc::new(LoadFeedUseCase::new(feed_port)),
            cache,
            action_tx,
            action_rx,
            completions,
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let images = ImageManager::new();
        info!(protocol = ?images.protocol_type(), "Terminal image protocol selected");

        self.request_feed();
        self.run_event_loop(terminal, &images).await?;

        info!(cache = %self.cache.stats(), "Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        images: &ImageManager,
    ) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut clock = interval(CLOCK_TICK_RATE);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.draw(terminal, images)?;

        while self.state != AppState::Exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                Some(completion) = self.completions.recv() => {
                    if !self.screen.handle_completion(completion) {
                        continue;
                    }
                }

                Some(Ok(event)) = terminal_events.next() => {
                    match self.handle_terminal_event(&event) {
                        EventResult::Exit => {
                            self.state = AppState::Exiting;
                            continue;
                        }
                        EventResult::Continue => continue,
                        EventResult::Redraw => {}
                    }
                }

                _ = clock.tick() => {}
            }

            self.draw(terminal, images)?;
        }

        Ok(())
    }

    /// Draws a frame, then shows or hides image views to match it.
    fn draw(&mut self, terminal: &mut DefaultTerminal, images: &ImageManager) -> std::io::Result<()> {
        terminal.draw(|frame| self.render(frame, images))?;
        if self.screen.sync_visibility() {
            terminal.draw(|frame| self.render(frame, images))?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, images: &ImageManager) {
        let [feed_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        frame.render_stateful_widget(
            FeedScreen::new(images.picker(), Utc::now()),
            feed_area,
            &mut self.screen,
        );
        frame.render_widget(&self.status_bar(), status_area);
    }

    fn status_bar(&self) -> StatusBar {
        let posts = self.screen.post_count();
        let (message, level) = match self.screen.status() {
            FeedStatus::Loading => ("Loading feed…".to_string(), StatusLevel::Info),
            FeedStatus::Loaded => {
                let position = self
                    .screen
                    .selected_index()
                    .map_or_else(String::new, |idx| format!(" ({}/{posts})", idx + 1));
                (format!("{posts} posts{position}"), StatusLevel::Info)
            }
            FeedStatus::Unavailable if posts > 0 => {
                ("Refresh failed".to_string(), StatusLevel::Warning)
            }
            FeedStatus::Unavailable => ("Feed unavailable".to_string(), StatusLevel::Error),
        };

        StatusBar::new()
            .left(message)
            .center(self.cache.stats().to_string())
            .right(KEY_HINTS)
            .level(level)
    }

    fn request_feed(&mut self) {
        self.screen.set_loading();

        let use_case = Arc::clone(&self.load_feed);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match use_case.execute().await {
                Some(posts) => Action::FeedLoaded(posts),
                None => Action::FeedUnavailable,
            };
            let _ = tx.send(action);
        });
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::FeedLoaded(posts) => self.screen.set_posts(posts),
            Action::FeedUnavailable => self.screen.set_unavailable(),
        }
    }

    fn handle_terminal_event(&mut self, event: &Event) -> EventResult {
        if EventHandler::is_resize_event(event) {
            return EventResult::Redraw;
        }
        let Some(key) = EventHandler::key_press(event) else {
            return EventResult::Continue;
        };

        match self.screen.handle_key(*key) {
            FeedKeyResult::Quit => EventResult::Exit,
            FeedKeyResult::Reload => {
                debug!("Reloading feed");
                self.request_feed();
                EventResult::Redraw
            }
            FeedKeyResult::Moved => EventResult::Redraw,
            FeedKeyResult::Ignored => EventResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FeedError;
    use crate::domain::ports::MockFeedPort;
    use crate::domain::ports::mocks::MockImageFetcher;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn app(port: MockFeedPort) -> App {
        App::new(
            Arc::new(port),
            Arc::new(MockImageFetcher::new()),
            Arc::new(MemoryImageCache::new(8)),
            &AppConfig::default(),
        )
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_feed_request_populates_screen() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts()
            .times(1)
            .returning(|| Ok(vec![Post::new("p1", "hello"), Post::new("p2", "world")]));
        let mut app = app(port);

        app.request_feed();
        assert_eq!(app.screen.status(), FeedStatus::Loading);

        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);
        assert_eq!(app.screen.status(), FeedStatus::Loaded);
        assert_eq!(app.screen.post_count(), 2);
    }

    #[tokio::test]
    async fn test_feed_failure_leaves_posts_empty() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts()
            .times(1)
            .returning(|| Err(FeedError::Status { status: 500 }));
        let mut app = app(port);

        app.request_feed();
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);

        assert_eq!(app.screen.status(), FeedStatus::Unavailable);
        assert_eq!(app.screen.post_count(), 0);
    }

    #[tokio::test]
    async fn test_reload_key_refetches() {
        let mut port = MockFeedPort::new();
        port.expect_fetch_posts()
            .times(1)
            .returning(|| Ok(vec![Post::new("p1", "hello")]));
        let mut app = app(port);

        assert_eq!(
            app.handle_terminal_event(&press(KeyCode::Char('r'))),
            EventResult::Redraw
        );
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);
        assert_eq!(app.screen.post_count(), 1);
    }

    #[test]
    fn test_quit_and_navigation_keys() {
        let mut app = app(MockFeedPort::new());
        app.handle_action(Action::FeedLoaded(vec![
            Post::new("p1", "a"),
            Post::new("p2", "b"),
        ]));

        assert_eq!(
            app.handle_terminal_event(&press(KeyCode::Char('j'))),
            EventResult::Redraw
        );
        assert_eq!(app.screen.selected_index(), Some(1));
        assert_eq!(
            app.handle_terminal_event(&press(KeyCode::Char('x'))),
            EventResult::Continue
        );
        assert_eq!(
            app.handle_terminal_event(&Event::Resize(100, 40)),
            EventResult::Redraw
        );
        assert_eq!(
            app.handle_terminal_event(&press(KeyCode::Esc)),
            EventResult::Exit
        );
    }

    #[test]
    fn test_status_bar_reflects_feed_state() {
        let mut app = app(MockFeedPort::new());
        let bar = format!("{:?}", app.status_bar());
        assert!(bar.contains("Loading feed"));

        app.handle_action(Action::FeedUnavailable);
        let bar = format!("{:?}", app.status_bar());
        assert!(bar.contains("Feed unavailable"));
        assert!(bar.contains("Error"));

        app.handle_action(Action::FeedLoaded(vec![Post::new("p1", "a")]));
        let bar = format!("{:?}", app.status_bar());
        assert!(bar.contains("1 posts (1/1)"));
    }
}
