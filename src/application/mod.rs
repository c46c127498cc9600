//! Application layer with use cases and presentation-independent services.

/// Formatting services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use use_cases::LoadFeedUseCase;
