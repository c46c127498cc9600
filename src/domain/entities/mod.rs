//! Domain entity definitions.

mod attachment;
mod image;
mod post;
mod user;

pub use attachment::{Attachment, Thumbnail, ThumbnailCollection};
pub use self::image::LoaderState;
pub use post::Post;
pub use user::{DEFAULT_AVATAR_URL, User};
