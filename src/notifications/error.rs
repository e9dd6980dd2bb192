// ABOUTME: Error types for the toast manager lifecycle
// Toast operations themselves never fail; only timer startup can

use thiserror::Error;

/// Failures starting the sweep timer.
#[derive(Debug, Error)]
pub enum ToastError {
    /// `start` was called outside a tokio runtime.
    #[error("Sweep timer needs a running tokio runtime")]
    NoRuntime,

    /// The configured sweep interval is zero.
    #[error("Sweep interval must be greater than zero")]
    InvalidInterval,
}
