//! Scrapbook API client.

mod client;

pub use client::ScrapbookClient;
