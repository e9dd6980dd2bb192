// ABOUTME: Toast data model representing a single transient notification
// Immutable once built; expiry and elapsed text are derived from a caller-supplied instant

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Time-to-live applied when a toast is built without an explicit one.
pub const DEFAULT_TTL: TimeDelta = TimeDelta::seconds(30);

/// Presentation hint carried with each toast. The manager never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Default emphasis.
    #[default]
    Primary,
    /// Muted emphasis.
    Secondary,
    /// Dark styling.
    Dark,
    /// Light styling.
    Light,
    /// An operation completed.
    Success,
    /// An operation failed.
    Danger,
    /// Something needs attention.
    Warning,
    /// Neutral information.
    Info,
}

impl Severity {
    /// Every severity, in declaration order.
    pub const ALL: [Severity; 8] = [
        Severity::Primary,
        Severity::Secondary,
        Severity::Dark,
        Severity::Light,
        Severity::Success,
        Severity::Danger,
        Severity::Warning,
        Severity::Info,
    ];

    /// Lowercase name, as used by `Display`, `FromStr` and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Dark => "dark",
            Severity::Light => "light",
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a severity name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == wanted)
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

/// A single transient notification. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    id: Uuid,
    title: String,
    message: String,
    severity: Severity,
    posted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Toast {
    /// Build a toast posted now that expires `ttl` from now.
    ///
    /// A zero or negative `ttl` is accepted and yields a toast that is
    /// already expired, so the next sweep drops it.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        ttl: TimeDelta,
    ) -> Self {
        Self::posted(Utc::now(), title, message, severity, ttl)
    }

    /// Build a toast with an explicit posting instant.
    ///
    /// A `ttl` that would push the expiry past the representable range is
    /// clamped to the latest (or earliest) instant chrono can hold.
    pub fn posted(
        at: DateTime<Utc>,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            severity,
            posted_at: at,
            expires_at: at.checked_add_signed(ttl).unwrap_or(if ttl < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }),
        }
    }

    /// Success toast with the default TTL.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Success, DEFAULT_TTL)
    }

    /// Danger toast with the default TTL.
    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Danger, DEFAULT_TTL)
    }

    /// Warning toast with the default TTL.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Warning, DEFAULT_TTL)
    }

    /// Info toast with the default TTL.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Info, DEFAULT_TTL)
    }

    /// Unique id assigned at construction.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Presentation severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// When the toast was created.
    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }

    /// Instant after which the toast counts as expired.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True once `at` is strictly past `expires_at`.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at > self.expires_at
    }

    /// Human readable age: seconds wording below one minute, minutes after.
    pub fn elapsed_display_text(&self, at: DateTime<Utc>) -> String {
        let elapsed = (at - self.posted_at).num_seconds().max(0);
        if elapsed < 60 {
            format!("{} secs ago", elapsed)
        } else {
            format!("{} mins ago", elapsed / 60)
        }
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new("", "", Severity::default(), DEFAULT_TTL)
    }
}

impl PartialEq for Toast {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Toast {}
