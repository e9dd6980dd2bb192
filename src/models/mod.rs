// ABOUTME: Core data models for toast notifications

/// Toast value type and severity.
pub mod toast;

pub use toast::{ParseSeverityError, Severity, Toast, DEFAULT_TTL};
