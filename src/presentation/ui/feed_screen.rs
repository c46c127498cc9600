//! Scrollable feed of posts with lazily loaded images.

use std::collections::HashMap;
use std::ops::Range;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget},
};
use ratatui_image::picker::Picker;
use tracing::{debug, trace};

use super::utils::{username_color, wrap_text};
use crate::application::services::scrapbook_format;
use crate::domain::entities::{Post, User};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::image::{FetchCompletion, LoaderContext, LoaderId};
use crate::presentation::events::EventHandler;
use crate::presentation::widgets::AsyncImage;

const GUTTER_WIDTH: u16 = 2;
const AVATAR_WIDTH: u16 = 4;
const AVATAR_PLACEHOLDER: &str = "·";

/// Layout and placeholder settings for the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    pub placeholder: String,
    pub show_avatars: bool,
    pub image_height: u16,
}

impl FeedSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            placeholder: config.images.placeholder.clone(),
            show_avatars: config.ui.show_avatars,
            image_height: config.ui.image_height.max(1),
        }
    }

    const fn header_height(&self) -> u16 {
        if self.show_avatars { 2 } else { 1 }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            placeholder: "Loading…".to_string(),
            show_avatars: false,
            image_height: 10,
        }
    }
}

/// Feed retrieval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Loading,
    Loaded,
    Unavailable,
}

/// Result of handling a key on the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKeyResult {
    Quit,
    Reload,
    Moved,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageSlot {
    Avatar(usize),
    Attachment { post: usize, index: usize },
}

#[derive(Debug)]
struct PostEntry {
    post: Post,
    avatar: Option<AsyncImage>,
    images: Vec<AsyncImage>,
}

impl PostEntry {
    fn new(post: Post, context: &LoaderContext, settings: &FeedSettings) -> Self {
        let avatar = if settings.show_avatars {
            post.user()
                .and_then(User::avatar_url)
                .map(|url| AsyncImage::new(url, context.clone(), AVATAR_PLACEHOLDER))
        } else {
            None
        };

        let images = post
            .image_urls()
            .into_iter()
            .map(|url| AsyncImage::new(url, context.clone(), settings.placeholder.as_str()))
            .collect();

        Self {
            post,
            avatar,
            images,
        }
    }

    fn views_mut(&mut self) -> impl Iterator<Item = &mut AsyncImage> {
        self.avatar.iter_mut().chain(self.images.iter_mut())
    }

    fn text_lines(&self, width: u16) -> Vec<String> {
        wrap_text(self.post.text(), usize::from(width.saturating_sub(GUTTER_WIDTH)))
    }

    fn height(&self, width: u16, settings: &FeedSettings) -> u16 {
        let text = u16::try_from(self.text_lines(width).len()).unwrap_or(u16::MAX);
        let images = if self.images.is_empty() {
            0
        } else {
            settings.image_height
        };
        // header, text, caption, images, separator
        settings
            .header_height()
            .saturating_add(text)
            .saturating_add(1)
            .saturating_add(images)
            .saturating_add(1)
    }

    /// Returns true if any view changed visibility.
    fn set_visible(&mut self, visible: bool) -> bool {
        let mut changed = false;
        for view in self.views_mut() {
            if view.is_visible() == visible {
                continue;
            }
            if visible {
                view.on_appear();
            } else {
                view.on_disappear();
            }
            changed = true;
        }
        changed
    }

    fn header_lines(&self, now: DateTime<Utc>, settings: &FeedSettings) -> Vec<Line<'_>> {
        let (name, streak) = self
            .post
            .user()
            .map_or(("anonymous", 0), |user| (user.username(), user.streak_count()));
        let when = self
            .post
            .timestamp()
            .map(|at| scrapbook_format(at, now))
            .unwrap_or_default();

        let mut author = vec![Span::styled(
            format!("@{name}"),
            Style::default()
                .fg(username_color(name))
                .add_modifier(Modifier::BOLD),
        )];
        if streak > 0 {
            author.push(Span::styled(
                format!(" 🔥{streak}"),
                Style::default().fg(Color::LightRed),
            ));
        }

        let when = Span::styled(when, Style::default().fg(Color::DarkGray));
        if settings.show_avatars {
            vec![Line::from(author), Line::from(when)]
        } else {
            author.push(Span::raw("  "));
            author.push(when);
            vec![Line::from(author)]
        }
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        picker: &Picker,
        selected: bool,
        now: DateTime<Utc>,
        settings: &FeedSettings,
    ) {
        let body_height = self
            .height(area.width, settings)
            .saturating_sub(1)
            .min(area.height);
        let body = Rect {
            height: body_height,
            ..area
        };
        let gutter = Block::new()
            .borders(Borders::LEFT)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = gutter.inner(body);
        let inner = Rect {
            x: inner.x.saturating_add(1),
            width: inner.width.saturating_sub(1),
            ..inner
        };
        if selected {
            gutter.render(body, buf);
        }

        let mut rows = Rows::new(inner);

        if let Some(header) = rows.take(settings.header_height()) {
            let text_area = if let Some(avatar) = self.avatar.as_mut() {
                let [avatar_area, _, text_area] = Layout::horizontal([
                    Constraint::Length(AVATAR_WIDTH),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(header);
                avatar.render(avatar_area, buf, picker);
                text_area
            } else {
                header
            };
            Paragraph::new(self.header_lines(now, settings)).render(text_area, buf);
        }

        let text: Vec<Line> = self
            .text_lines(area.width)
            .into_iter()
            .map(Line::from)
            .collect();
        if let Some(text_area) = rows.take(u16::try_from(text.len()).unwrap_or(u16::MAX)) {
            Paragraph::new(text).render(text_area, buf);
        }

        if let Some(caption) = rows.take(1) {
            Paragraph::new(self.post.attachment_caption())
                .style(Style::default().fg(Color::DarkGray))
                .render(caption, buf);
        }

        if self.images.is_empty() {
            return;
        }
        if let Some(row) = rows.take(settings.image_height) {
            let count = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
            let cells = Layout::horizontal(
                self.images
                    .iter()
                    .map(|_| Constraint::Ratio(1, count))
                    .collect::<Vec<_>>(),
            )
            .spacing(1)
            .split(row);
            for (image, cell) in self.images.iter_mut().zip(cells.iter()) {
                image.render(*cell, buf, picker);
            }
        }
    }
}

/// Hands out consecutive rows of an area, clipped at its bottom.
struct Rows {
    area: Rect,
    y: u16,
}

impl Rows {
    const fn new(area: Rect) -> Self {
        Self { area, y: area.y }
    }

    fn take(&mut self, height: u16) -> Option<Rect> {
        let height = height.min(self.area.bottom().saturating_sub(self.y));
        if height == 0 {
            return None;
        }
        let rect = Rect::new(self.area.x, self.y, self.area.width, height);
        self.y += height;
        Some(rect)
    }
}

/// Feed screen state.
#[derive(Debug)]
pub struct FeedScreenState {
    context: LoaderContext,
    settings: FeedSettings,
    entries: Vec<PostEntry>,
    routes: HashMap<LoaderId, ImageSlot>,
    status: FeedStatus,
    selected: usize,
    offset: usize,
    visible: Range<usize>,
}

impl FeedScreenState {
    #[must_use]
    pub fn new(context: LoaderContext, settings: FeedSettings) -> Self {
        Self {
            context,
            settings,
            entries: Vec::new(),
            routes: HashMap::new(),
            status: FeedStatus::Loading,
            selected: 0,
            offset: 0,
            visible: 0..0,
        }
    }

    /// Replaces the posts, dropping every previous image view.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.entries = posts
            .into_iter()
            .map(|post| PostEntry::new(post, &self.context, &self.settings))
            .collect();

        self.routes.clear();
        for (post, entry) in self.entries.iter().enumerate() {
            if let Some(avatar) = &entry.avatar {
                self.routes.insert(avatar.id(), ImageSlot::Avatar(post));
            }
            for (index, image) in entry.images.iter().enumerate() {
                self.routes
                    .insert(image.id(), ImageSlot::Attachment { post, index });
            }
        }

        self.status = FeedStatus::Loaded;
        self.selected = 0;
        self.offset = 0;
        self.visible = 0..0;
        debug!(
            posts = self.entries.len(),
            views = self.routes.len(),
            "Feed populated"
        );
    }

    pub fn set_loading(&mut self) {
        self.status = FeedStatus::Loading;
    }

    /// Marks the feed unavailable. Posts already shown stay.
    pub fn set_unavailable(&mut self) {
        self.status = FeedStatus::Unavailable;
    }

    #[must_use]
    pub const fn status(&self) -> FeedStatus {
        self.status
    }

    #[must_use]
    pub fn post_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.selected)
    }

    #[must_use]
    pub fn selected_post(&self) -> Option<&Post> {
        self.entries.get(self.selected).map(|entry| &entry.post)
    }

    /// Posts that fit the viewport during the last render.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        self.visible.clone()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub const fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub const fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FeedKeyResult {
        if EventHandler::is_quit_event(&key) {
            return FeedKeyResult::Quit;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),
            KeyCode::Char('r') => return FeedKeyResult::Reload,
            _ => return FeedKeyResult::Ignored,
        }
        FeedKeyResult::Moved
    }

    /// Routes a fetch completion to the view that started it.
    ///
    /// Completions for views dropped by a reload are discarded.
    pub fn handle_completion(&mut self, completion: FetchCompletion) -> bool {
        let Some(slot) = self.routes.get(&completion.loader()).copied() else {
            trace!(loader = %completion.loader(), "Dropping completion for retired view");
            return false;
        };

        let view = match slot {
            ImageSlot::Avatar(post) => self
                .entries
                .get_mut(post)
                .and_then(|entry| entry.avatar.as_mut()),
            ImageSlot::Attachment { post, index } => self
                .entries
                .get_mut(post)
                .and_then(|entry| entry.images.get_mut(index)),
        };
        view.is_some_and(|view| view.handle_completion(completion))
    }

    /// Shows the views of posts inside the last rendered viewport and hides
    /// the rest.
    ///
    /// Returns true if any view changed visibility.
    pub fn sync_visibility(&mut self) -> bool {
        let mut changed = false;
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            changed |= entry.set_visible(self.visible.contains(&idx));
        }
        changed
    }

    fn scroll_to_selection(&mut self, width: u16, height: u16) {
        if self.entries.is_empty() {
            self.selected = 0;
            self.offset = 0;
            return;
        }

        self.selected = self.selected.min(self.entries.len() - 1);
        if self.selected < self.offset {
            self.offset = self.selected;
        }

        while self.offset < self.selected {
            let needed: u32 = self.entries[self.offset..=self.selected]
                .iter()
                .map(|entry| u32::from(entry.height(width, &self.settings)))
                .sum();
            if needed <= u32::from(height) {
                break;
            }
            self.offset += 1;
        }
    }
}

/// Feed screen widget.
pub struct FeedScreen<'a> {
    picker: &'a Picker,
    now: DateTime<Utc>,
}

impl<'a> FeedScreen<'a> {
    #[must_use]
    pub const fn new(picker: &'a Picker, now: DateTime<Utc>) -> Self {
        Self { picker, now }
    }
}

impl StatefulWidget for FeedScreen<'_> {
    type State = FeedScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .title(" Scrapbook ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if state.entries.is_empty() {
            state.visible = 0..0;
            let message = match state.status {
                FeedStatus::Loading => "Loading feed…",
                FeedStatus::Loaded => "No posts yet.",
                FeedStatus::Unavailable => "Feed unavailable. Press r to retry.",
            };
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(inner);
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .render(middle, buf);
            return;
        }

        state.scroll_to_selection(inner.width, inner.height);

        let settings = &state.settings;
        let mut y = inner.y;
        let mut end = state.offset;
        for idx in state.offset..state.entries.len() {
            if y >= inner.bottom() {
                break;
            }
            let entry = &mut state.entries[idx];
            let height = entry
                .height(inner.width, settings)
                .min(inner.bottom() - y);
            let area = Rect::new(inner.x, y, inner.width, height);
            entry.render(
                area,
                buf,
                self.picker,
                idx == state.selected,
                self.now,
                settings,
            );
            y += height;
            end = idx + 1;
        }
        state.visible = state.offset..end;
    }
}
