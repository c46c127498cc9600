mod image_view;
mod status_bar;

pub use image_view::{AsyncImage, ImageContent, ImageManager};
pub use status_bar::{StatusBar, StatusLevel};
