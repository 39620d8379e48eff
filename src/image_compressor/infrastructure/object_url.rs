//! Revocable handles to in-memory blobs.
//!
//! An [`ObjectUrl`] keeps its blob registered until it is dropped, so replacing
//! a preview releases the previous one without any explicit bookkeeping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::error::InfrastructureError;

const URL_PREFIX: &str = "blob:image-compressor/";

type Blobs = Arc<Mutex<HashMap<String, Arc<[u8]>>>>;

fn lock(blobs: &Mutex<HashMap<String, Arc<[u8]>>>) -> MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
    blobs.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    blobs: Blobs,
    next_id: Arc<AtomicU64>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, data: Arc<[u8]>) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("{}{}", URL_PREFIX, id);
        lock(&self.blobs).insert(url.clone(), data);
        debug!("Created object URL {}", url);
        ObjectUrl {
            url,
            blobs: self.blobs.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Result<Arc<[u8]>, InfrastructureError> {
        lock(&self.blobs)
            .get(url)
            .cloned()
            .ok_or_else(|| InfrastructureError::UrlRevoked(url.to_string()))
    }

    /// Number of URLs that have not been revoked yet.
    pub fn live_count(&self) -> usize {
        lock(&self.blobs).len()
    }
}

/// A registered URL. Revoked on drop.
pub struct ObjectUrl {
    url: String,
    blobs: Blobs,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        lock(&self.blobs).remove(&self.url);
        debug!("Revoked object URL {}", self.url);
    }
}

impl std::fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl std::fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}
