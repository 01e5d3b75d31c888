use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::domain::kv_store::KeyValueStore;
use crate::infrastructure::memory_kv::MemoryKeyValueStore;

/// Store whose every operation fails, counting the attempts. Clones share counters.
#[derive(Clone, Default)]
pub struct FailingStore {
    pub sets: Arc<AtomicUsize>,
    pub removes: Arc<AtomicUsize>,
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> { bail!("disk unavailable") }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        bail!("quota exceeded")
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        bail!("disk unavailable")
    }
}

/// Store whose writes take longer the earlier they are issued, so writes
/// that are not sequenced finish in reverse order.
#[derive(Clone, Default)]
pub struct SlowStore {
    pub inner: MemoryKeyValueStore,
    pub sets: Arc<AtomicUsize>,
}

impl SlowStore {
    const SLOWEST_MS: u64 = 40;
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>> { self.inner.get(key).await }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let call = self.sets.fetch_add(1, Ordering::SeqCst) as u64;
        let delay = Self::SLOWEST_MS.saturating_sub(call * 5).max(1);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> { self.inner.remove(key).await }
}
