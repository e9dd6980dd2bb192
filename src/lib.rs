// ABOUTME: Library crate for Toast-Box exposing the toast manager API for embedding and testing

//! Transient toast notifications with timed expiry and change signals.

/// Time sources for expiry checks.
pub mod clock;
/// Manager configuration loaded from TOML.
pub mod config;
/// Toast data model.
pub mod models;
/// Toast lifecycle manager and signals.
pub mod notifications;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ManagerConfig};
pub use models::{Severity, Toast};
pub use notifications::{SignalKind, Subscription, ToastError, ToastManager};
