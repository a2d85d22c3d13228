//! Shared application state for the goal service.
//!
//! Holds the injected store handle plus the metrics registry and access log.
//! Cloning is cheap; every handler and middleware gets the same instance.

use std::sync::Arc;

use crate::obs::{AccessLog, ProcessInfo, ServiceMetrics};
use crate::store::GoalStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn GoalStore>,
    metrics: ServiceMetrics,
    process: ProcessInfo,
    access_log: AccessLog,
}

impl AppState {
    pub fn new(store: Arc<dyn GoalStore>, access_log: AccessLog) -> Self {
        tracing::info!(backend = store.backend(), access_log = %access_log.path().display(), "app state ready");
        Self {
            inner: Arc::new(AppStateInner {
                store,
                metrics: ServiceMetrics::default(),
                process: ProcessInfo::new(),
                access_log,
            }),
        }
    }

    pub fn store(&self) -> &dyn GoalStore {
        self.inner.store.as_ref()
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    /// Process gauges appended to the `/metrics` output.
    pub fn metrics_extra(&self) -> Vec<(&'static str, f64)> {
        self.inner.process.gauges()
    }

    pub fn access_log(&self) -> &AccessLog {
        &self.inner.access_log
    }
}
