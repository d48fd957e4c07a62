//! In-memory forecast cache keyed by the requested city string.
//!
//! Staleness is evaluated lazily on read: an entry whose first period started
//! more than `expiry` ago is reported as missing but left in the map until the
//! next `set` for the same key overwrites it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::weather::Forecast;

const DEFAULT_EXPIRY_HOURS: i64 = 5;
const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct ForecastCache {
    data: RwLock<HashMap<String, Arc<Forecast>>>,
    expiry: Duration,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::with_expiry(Duration::hours(DEFAULT_EXPIRY_HOURS))
    }

    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            data: RwLock::new(HashMap::with_capacity(DEFAULT_CAPACITY)),
            expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Inserts or replaces the forecast stored under `key`. Readers get the
    /// same `Arc`, never a copy.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Arc<Forecast>>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Returns the forecast stored under `key` if it has not expired.
    pub fn get(&self, key: &str) -> Option<Arc<Forecast>> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Arc<Forecast>> {
        let data = self.data.read();
        let entry = data.get(key)?;
        if self.is_stale(entry, now) {
            return None;
        }
        Some(Arc::clone(entry))
    }

    fn is_stale(&self, entry: &Forecast, now: DateTime<Utc>) -> bool {
        // No periods means no timestamp to age from.
        let Some(first) = entry.detail.first() else {
            return true;
        };
        now.signed_duration_since(first.start_time) > self.expiry
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new()
    }
}
