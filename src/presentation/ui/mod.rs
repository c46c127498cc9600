//! UI screens.

mod app;
mod feed_screen;
mod utils;

pub use app::App;
pub use feed_screen::{FeedKeyResult, FeedScreen, FeedScreenState, FeedSettings, FeedStatus};
