//! Latest-known-good state from both sources and the view derived from it.
//!
//! Each source's value is kept behind an `Arc` and replaced by swapping the
//! pointer under a write lock, so a reader either sees the previous snapshot
//! or the next one, never a mix. The lock is never held across an `.await`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local};

use crate::types::{ConnectionState, HealthStatus, MetricsSnapshot};

/// Read-only projection handed to the UI.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub metrics: Option<Arc<MetricsSnapshot>>,
    pub health: Option<Arc<HealthStatus>>,
    pub connection: ConnectionState,
    /// Local time of the last committed frame.
    pub updated_at: Option<DateTime<Local>>,
}

impl ViewModel {
    /// No snapshot has ever been committed.
    pub fn is_loading(&self) -> bool {
        self.metrics.is_none()
    }
}

#[derive(Debug, Default)]
struct Inner {
    metrics: Option<Arc<MetricsSnapshot>>,
    health: Option<Arc<HealthStatus>>,
    connection: ConnectionState,
    updated_at: Option<DateTime<Local>>,
    retired: bool,
}

/// Cheap to clone; all clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<RwLock<Inner>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot. Returns false if the store was retired.
    pub fn commit_metrics(&self, snapshot: MetricsSnapshot) -> bool {
        let mut g = self.write();
        if g.retired {
            return false;
        }
        g.metrics = Some(Arc::new(snapshot));
        g.updated_at = Some(Local::now());
        true
    }

    /// Replace the stored health status. Returns false if the store was retired.
    pub fn commit_health(&self, status: HealthStatus) -> bool {
        let mut g = self.write();
        if g.retired {
            return false;
        }
        g.health = Some(Arc::new(status));
        true
    }

    // Only the stream session reports connection changes.
    pub(crate) fn observe_connection(&self, state: ConnectionState) {
        self.write().connection = state;
    }

    /// Stop accepting commits; anything arriving later is dropped.
    pub fn retire(&self) {
        self.write().retired = true;
    }

    pub fn is_retired(&self) -> bool {
        self.read().retired
    }

    pub fn current_view(&self) -> ViewModel {
        let g = self.read();
        ViewModel {
            metrics: g.metrics.clone(),
            health: g.health.clone(),
            connection: g.connection,
            updated_at: g.updated_at,
        }
    }

    // A panic elsewhere never leaves a half-written value behind (commits are
    // single assignments), so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{ActiveService, Memory, NetworkConnection};
    use std::collections::BTreeMap;

    pub(crate) fn snapshot(cpu: f64, uptime: &str) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu_usage_percent: cpu,
            memory: Memory {
                total_bytes: 1000,
                available_bytes: 400,
                used_bytes: 600,
                percent: 60.0,
            },
            uptime: uptime.into(),
            network_connections: vec![NetworkConnection {
                local_address: "127.0.0.1:5000".into(),
                remote_address: None,
                status: "ESTABLISHED".into(),
            }],
            active_ports: vec!["0.0.0.0:5000".into()],
            active_services: vec![ActiveService {
                pid: 1,
                name: "python".into(),
                port: "0.0.0.0:5000".into(),
            }],
        }
    }

    fn healthy() -> HealthStatus {
        HealthStatus {
            status: "healthy".into(),
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn starts_absent_and_loading() {
        let store = StateStore::new();
        let v = store.current_view();
        assert!(v.is_loading());
        assert!(v.health.is_none());
        assert_eq!(v.connection, ConnectionState::Connecting);
        assert!(v.updated_at.is_none());
    }

    #[test]
    fn each_commit_replaces_the_whole_snapshot() {
        let store = StateStore::new();
        let mut second = snapshot(80.0, "3d");
        second.active_ports.clear();
        second.network_connections.clear();

        store.commit_metrics(snapshot(10.0, "2d"));
        store.commit_metrics(second.clone());

        let v = store.current_view();
        assert_eq!(v.metrics.as_deref(), Some(&second));
        assert!(v.updated_at.is_some());
    }

    #[test]
    fn health_and_metrics_are_independent() {
        let store = StateStore::new();
        store.commit_metrics(snapshot(10.0, "2d"));
        let before = store.current_view().metrics;

        store.commit_health(healthy());
        let v = store.current_view();
        assert!(Arc::ptr_eq(before.as_ref().unwrap(), v.metrics.as_ref().unwrap()));

        store.commit_metrics(snapshot(20.0, "2d"));
        assert_eq!(store.current_view().health.as_deref(), Some(&healthy()));
    }

    #[test]
    fn earlier_views_are_not_mutated_by_later_commits() {
        let store = StateStore::new();
        store.commit_metrics(snapshot(10.0, "2d"));
        let old = store.current_view();
        store.commit_metrics(snapshot(90.0, "5d"));
        assert_eq!(old.metrics.unwrap().cpu_usage_percent, 10.0);
    }

    #[test]
    fn retired_store_ignores_commits() {
        let store = StateStore::new();
        store.commit_metrics(snapshot(10.0, "2d"));
        store.retire();
        assert!(!store.commit_metrics(snapshot(99.0, "9d")));
        assert!(!store.commit_health(healthy()));
        let v = store.current_view();
        assert_eq!(v.metrics.unwrap().cpu_usage_percent, 10.0);
        assert!(v.health.is_none());
    }

    #[test]
    fn concurrent_readers_never_see_torn_snapshots() {
        let store = StateStore::new();
        store.commit_metrics(snapshot(0.0, "0"));
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 1..500 {
                    store.commit_metrics(snapshot(i as f64, &i.to_string()));
                }
            })
        };
        for _ in 0..500 {
            let m = store.current_view().metrics.unwrap();
            assert_eq!(m.uptime, format!("{}", m.cpu_usage_percent as u64));
        }
        writer.join().unwrap();
    }
}
