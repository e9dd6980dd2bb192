// ABOUTME: Toast lifecycle manager owning the active toast list
// Sweeps expired toasts on every call and on a periodic timer, emitting changed/tick signals

use crate::clock::{Clock, SystemClock};
use crate::config::ManagerConfig;
use crate::models::{Severity, Toast};
use crate::notifications::signal::{Signal, SubscriptionId};
use crate::notifications::ToastError;
use chrono::TimeDelta;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

/// Which of the manager's two signals a subscription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The toast list changed structurally.
    Changed,
    /// A timer cycle finished.
    Tick,
}

/// Handle returned by `subscribe_changed`/`subscribe_tick`, consumed by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    kind: SignalKind,
    id: SubscriptionId,
}

impl Subscription {
    /// Signal this subscription is attached to.
    pub fn kind(&self) -> SignalKind {
        self.kind
    }
}

/// Shared handle to a toast collection. Clones refer to the same list,
/// the same subscribers and the same sweep timer.
#[derive(Clone)]
pub struct ToastManager {
    shared: Arc<Shared>,
}

struct Shared {
    toasts: Mutex<Vec<Toast>>,
    changed: Signal,
    tick: Signal,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
    default_ttl: TimeDelta,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ToastManager {
    /// Manager with default settings and the system clock.
    pub fn new() -> Self {
        Self::from_config(&ManagerConfig::default())
    }

    /// Manager with the given settings and the system clock.
    pub fn from_config(config: &ManagerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Manager with the given settings, reading time from `clock`.
    pub fn with_clock(config: &ManagerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                toasts: Mutex::new(Vec::new()),
                changed: Signal::new("changed"),
                tick: Signal::new("tick"),
                clock,
                sweep_interval: config.sweep_interval(),
                default_ttl: config.default_ttl(),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Interval between timer cycles.
    pub fn sweep_interval(&self) -> Duration {
        self.shared.sweep_interval
    }

    /// TTL used by `post`.
    pub fn default_ttl(&self) -> TimeDelta {
        self.shared.default_ttl
    }

    /// Build a toast stamped with this manager's clock. It is not added.
    pub fn new_toast(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        ttl: TimeDelta,
    ) -> Toast {
        Toast::posted(self.shared.clock.now(), title, message, severity, ttl)
    }

    /// Build a toast with the configured default TTL, add it, and return its id.
    pub fn post(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Uuid {
        let toast = self.new_toast(title, message, severity, self.shared.default_ttl);
        let id = toast.id();
        self.add(toast);
        id
    }

    /// Cheap size check. Does not sweep.
    pub fn has_toasts(&self) -> bool {
        !self.shared.lock_toasts().is_empty()
    }

    /// Number of toasts held, expired or not. Does not sweep.
    pub fn len(&self) -> usize {
        self.shared.lock_toasts().len()
    }

    /// Inverse of `has_toasts`.
    pub fn is_empty(&self) -> bool {
        !self.has_toasts()
    }

    /// Sweep expired toasts, then return a snapshot of the rest in insertion order.
    pub fn get_toasts(&self) -> Vec<Toast> {
        self.shared.sweep();
        self.shared.lock_toasts().clone()
    }

    /// Append a toast, then sweep. Fires `changed` exactly once.
    pub fn add(&self, toast: Toast) {
        debug!(
            "Adding {} toast {} (expires {})",
            toast.severity(),
            toast.id(),
            toast.expires_at()
        );
        self.shared.lock_toasts().push(toast);

        if !self.shared.sweep() {
            self.shared.changed.emit();
        }
    }

    /// Remove a toast by id. Unknown ids are ignored; returns whether a toast was removed.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = {
            let mut toasts = self.shared.lock_toasts();
            match toasts.iter().position(|t| t.id() == id) {
                Some(index) => {
                    toasts.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            debug!("Removed toast {}", id);
        }

        let swept = self.shared.sweep();
        if removed && !swept {
            self.shared.changed.emit();
        }
        removed
    }

    /// Drop every toast, firing `changed` once if any were held.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut *self.shared.lock_toasts());
        if !dropped.is_empty() {
            debug!("Cleared {} toasts", dropped.len());
            self.shared.changed.emit();
        }
    }

    /// Call `handler` whenever the toast list changes.
    pub fn subscribe_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        Subscription {
            kind: SignalKind::Changed,
            id: self.shared.changed.subscribe(handler),
        }
    }

    /// Call `handler` at the end of every timer cycle.
    pub fn subscribe_tick<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        Subscription {
            kind: SignalKind::Tick,
            id: self.shared.tick.subscribe(handler),
        }
    }

    /// Detach a handler. Returns false if it was already detached.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.shared.signal(subscription.kind).unsubscribe(subscription.id)
    }

    /// Number of handlers attached to `kind`.
    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.shared.signal(kind).subscriber_count()
    }

    /// Start the periodic sweep. The first cycle runs one interval from now.
    /// Calling this while the timer is already running does nothing.
    pub fn start(&self) -> Result<(), ToastError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ToastError::NoRuntime)?;
        let period = self.shared.sweep_interval;
        if period.is_zero() {
            return Err(ToastError::InvalidInterval);
        }

        let mut timer = self.shared.lock_timer();
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Sweep timer already running");
            return Ok(());
        }

        let weak = Arc::downgrade(&self.shared);
        *timer = Some(runtime.spawn(run_sweep_timer(weak, period)));
        info!("Started toast sweep timer (every {:?})", period);
        Ok(())
    }

    /// Stop the periodic sweep. Safe to call any number of times.
    pub fn stop(&self) {
        if self.shared.stop_timer() {
            info!("Stopped toast sweep timer");
        }
    }

    /// Whether the sweep timer is active.
    pub fn is_running(&self) -> bool {
        self.shared
            .lock_timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one timer cycle by hand: sweep, then tick.
    pub fn run_cycle(&self) {
        self.shared.run_cycle();
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToastManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastManager")
            .field("toasts", &self.len())
            .field("sweep_interval", &self.shared.sweep_interval)
            .field("changed", &self.shared.changed)
            .field("tick", &self.shared.tick)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Shared {
    fn lock_toasts(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn signal(&self, kind: SignalKind) -> &Signal {
        match kind {
            SignalKind::Changed => &self.changed,
            SignalKind::Tick => &self.tick,
        }
    }

    /// Drop every expired toast. Emits `changed` once and returns true if any were dropped.
    fn sweep(&self) -> bool {
        let now = self.clock.now();
        let expired: Vec<Toast> = {
            let mut toasts = self.lock_toasts();
            let (expired, live): (Vec<Toast>, Vec<Toast>) = std::mem::take(&mut *toasts)
                .into_iter()
                .partition(|t| t.is_expired(now));
            *toasts = live;
            expired
        };

        if expired.is_empty() {
            return false;
        }
        for toast in &expired {
            debug!("Toast {} expired at {}", toast.id(), toast.expires_at());
        }
        self.changed.emit();
        true
    }

    fn run_cycle(&self) {
        self.sweep();
        self.tick.emit();
    }

    fn stop_timer(&self) -> bool {
        let handle = self.lock_timer().take();
        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

async fn run_sweep_timer(shared: Weak<Shared>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            debug!("Toast manager dropped, ending sweep timer");
            break;
        };
        shared.run_cycle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn fixed_clock(at: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || at);
        Arc::new(clock)
    }

    fn count_changed(manager: &ToastManager) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = count.clone();
        manager.subscribe_changed(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_add_with_coinciding_expiry_fires_changed_once() {
        let manager = ToastManager::with_clock(&ManagerConfig::default(), fixed_clock(epoch()));
        let stale = Toast::posted(
            epoch() - TimeDelta::seconds(60),
            "Old",
            "",
            Severity::Info,
            TimeDelta::seconds(1),
        );
        // Stale toast goes in without triggering anything else
        manager.shared.lock_toasts().push(stale.clone());
        let changed = count_changed(&manager);

        let fresh = manager.new_toast("New", "", Severity::Success, TimeDelta::seconds(10));
        manager.add(fresh.clone());

        assert_eq!(changed.load(Ordering::SeqCst), 1);
        assert_eq!(manager.get_toasts(), vec![fresh]);
    }

    #[test]
    fn test_sweep_reports_nothing_when_all_live() {
        let manager = ToastManager::with_clock(&ManagerConfig::default(), fixed_clock(epoch()));
        manager.add(manager.new_toast("A", "", Severity::Dark, TimeDelta::seconds(5)));
        let changed = count_changed(&manager);

        assert!(!manager.shared.sweep());
        assert_eq!(changed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let manager = ToastManager::new();
        assert!(matches!(manager.start(), Err(ToastError::NoRuntime)));
        assert!(!manager.is_running());
        manager.stop();
    }

    #[test]
    fn test_new_toast_uses_manager_clock() {
        let manager = ToastManager::with_clock(&ManagerConfig::default(), fixed_clock(epoch()));
        let toast = manager.new_toast("T", "M", Severity::Warning, TimeDelta::seconds(3));
        assert_eq!(toast.posted_at(), epoch());
        assert_eq!(toast.expires_at(), epoch() + TimeDelta::seconds(3));
        assert!(manager.is_empty());
    }
}
