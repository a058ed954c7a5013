//! Diagnostic observers for resolution events.
//!
//! Observers are registered on the [`Binder`](crate::Binder) and frozen with
//! the container. They are notified for every descriptor that does real work
//! (construction or alias redirection); cached singleton hits are not
//! reported.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for dependency injection resolution events.
///
/// Calls are made synchronously on the resolving thread; keep
/// implementations cheap.
///
/// # Examples
///
/// ```
/// use graft_di::{Binder, DiError, DiObserver, Key};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl DiObserver for PrintObserver {
///     fn resolving(&self, key: &Key) {
///         println!("-> {}", key.display_name());
///     }
///
///     fn resolved(&self, key: &Key, duration: Duration) {
///         println!("<- {} ({:?})", key.display_name(), duration);
///     }
/// }
///
/// let mut binder = Binder::new();
/// binder.add_observer(Arc::new(PrintObserver));
/// let container = binder.build().unwrap();
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a descriptor is realized.
    fn resolving(&self, key: &Key);

    /// Called after a descriptor was realized successfully.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when realizing a descriptor failed. The error still propagates.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Successful resolutions are logged at `DEBUG`, failures at `WARN`.
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[graft-di]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(prefix = %self.prefix, service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, service = key.display_name(), %error, "resolution failed");
    }
}

/// Observer collecting resolution counts and timings.
///
/// # Examples
///
/// ```
/// use graft_di::{Binder, Constructor, Injectable, MetricsObserver, Resolver, TypeShape};
/// use std::sync::Arc;
///
/// struct Cache;
/// impl Injectable for Cache {
///     fn shape() -> TypeShape {
///         TypeShape::concrete(vec![Constructor::<Self>::new("new").inject().build(|_| Ok(Cache))])
///     }
/// }
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let mut binder = Binder::new();
/// binder.bind_transient::<Cache>().unwrap();
/// binder.add_observer(metrics.clone());
/// let container = binder.build().unwrap();
///
/// container.get_required::<Cache>();
/// container.get_required::<Cache>();
/// assert_eq!(metrics.resolution_count(), 2);
/// assert_eq!(metrics.count_for::<Cache>(), 2);
/// ```
pub struct MetricsObserver {
    resolutions: AtomicU64,
    failures: AtomicU64,
    total_nanos: AtomicU64,
    per_service: Mutex<HashMap<Key, u64>>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            resolutions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            per_service: Mutex::new(HashMap::new()),
        }
    }

    /// Successful realizations across all services.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Successful realizations of service `T`.
    pub fn count_for<T: ?Sized + 'static>(&self) -> u64 {
        self.per_service
            .lock()
            .get(&Key::of::<T>())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed))
    }

    pub fn average_resolution_time(&self) -> Option<Duration> {
        match self.resolution_count() {
            0 => None,
            n => Some(Duration::from_nanos(
                self.total_nanos.load(Ordering::Relaxed) / n,
            )),
        }
    }

    pub fn reset(&self) {
        self.resolutions.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
        self.per_service.lock().clear();
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &Key) {}

    fn resolved(&self, key: &Key, duration: Duration) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        *self.per_service.lock().entry(*key).or_insert(0) += 1;
    }

    fn failed(&self, _key: &Key, _error: &DiError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}
