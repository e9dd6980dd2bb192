// ABOUTME: Toast notification lifecycle management
// Owns the active toast list, periodic expiry sweep, and change/tick signals

/// Error types for the manager lifecycle.
pub mod error;
/// The toast manager and its subscription handles.
pub mod manager;
pub(crate) mod signal;

pub use error::ToastError;
pub use manager::{SignalKind, Subscription, ToastManager};
