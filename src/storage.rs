//! Key-value slot storage behind the threshold store and forecast cache

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task;

/// Named byte slots with whole-value replacement
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: SlotStore> SlotStore for Arc<S> {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.as_ref().read(key).await
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.as_ref().write(key, bytes).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.as_ref().remove(key).await
    }
}

/// Durable slots in a fjall keyspace
#[derive(Clone)]
pub struct FjallStore {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let slots = db.keyspace("slots", fjall::KeyspaceCreateOptions::default)?;
        tracing::debug!(path = %path.as_ref().display(), "Opened slot store");
        Ok(FjallStore { store: slots })
    }
}

#[async_trait]
impl SlotStore for FjallStore {
    #[tracing::instrument(name = "read_slot", level = "debug", skip(self))]
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || get_from_store(store, key)).await?
    }

    #[tracing::instrument(name = "write_slot", level = "debug", skip(self, bytes))]
    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    #[tracing::instrument(name = "remove_slot", level = "debug", skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

/// Process-local slots; clones share the same map
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.slots
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.lock()?.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
