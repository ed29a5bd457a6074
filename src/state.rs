use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::EndpointRateLimiter;
use crate::overlap::ResourceFilter;
use crate::search::{MemoryIndex, SearchMirror};
use crate::types::{CarLicence, Shift};

/// A resource that can be double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKey {
    Car(i64),
    SafetyDriver(i64),
}

impl ResourceKey {
    pub fn for_filter(filter: &ResourceFilter) -> Vec<ResourceKey> {
        let mut keys = Vec::with_capacity(2);
        if let Some(car) = filter.car {
            keys.push(ResourceKey::Car(car.id));
        }
        if let Some(driver) = filter.safety_driver {
            keys.push(ResourceKey::SafetyDriver(driver.id));
        }
        keys
    }
}

/// Per-resource async locks that serialize check-then-write sequences.
///
/// Keys are always locked in sorted order, so two writers touching the same
/// car and driver cannot deadlock.
#[derive(Clone, Default)]
pub struct ResourceLocks {
    inner: Arc<Mutex<HashMap<ResourceKey, Arc<Mutex<()>>>>>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for every key. Locks are released when the guards drop.
    pub async fn acquire(&self, mut keys: Vec<ResourceKey>) -> Vec<OwnedMutexGuard<()>> {
        keys.sort();
        keys.dedup();
        let handles: Vec<Arc<Mutex<()>>> = {
            let mut map = self.inner.lock().await;
            keys.iter().map(|k| map.entry(*k).or_default().clone()).collect()
        };
        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }

    /// Drops entries nobody holds or waits on.
    pub async fn sweep(&self) {
        let mut map = self.inner.lock().await;
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// The shared application state.
///
/// Cloned into every handler by axum; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Primary store.
    pub db: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
    pub rate_limiter: EndpointRateLimiter,
    /// Search mirror for shifts, written after the store.
    pub shift_index: Arc<dyn SearchMirror<Shift>>,
    /// Search mirror for car licences, written after the store.
    pub licence_index: Arc<dyn SearchMirror<CarLicence>>,
    pub locks: ResourceLocks,
}

impl AppState {
    /// State with in-process search mirrors and the default endpoint limits:
    /// - 600 searches per minute
    /// - 120 shift writes per minute
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        Self::with_mirrors(db, config, MemoryIndex::<Shift>::shared(), MemoryIndex::<CarLicence>::shared())
    }

    pub fn with_mirrors(
        db: sqlx::SqlitePool,
        config: AppConfig,
        shift_index: Arc<dyn SearchMirror<Shift>>,
        licence_index: Arc<dyn SearchMirror<CarLicence>>,
    ) -> Self {
        let rate_limiter = EndpointRateLimiter::new().with_limits(vec![
            ("/api/_search", 600, 60),
            ("/api/shifts:write", 120, 60),
        ]);

        Self {
            db,
            config: Arc::new(config),
            metrics: Metrics::new(),
            rate_limiter,
            shift_index,
            licence_index,
            locks: ResourceLocks::new(),
        }
    }
}
