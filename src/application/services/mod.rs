pub mod timestamp_format;

pub use timestamp_format::{scrapbook_format, scrapbook_format_now};
