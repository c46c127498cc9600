//! Scrapbook - a terminal viewer for the Hack Club Scrapbook feed.
//!
//! This crate provides the feed viewer with clean architecture: a shared
//! in-memory image cache, per-URL cancellable image loaders driven by view
//! visibility, and a TUI that renders posts and their image attachments.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and formatting services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "scrapbook";
