use crate::core::storage::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "dashboard";

/// On-disk store backed by a fjall keyspace.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path.join("store"))
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open store partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key: {key}"))?
        else {
            debug!("Store MISS for key: {key}");
            return Ok(None);
        };
        debug!("Store HIT for key: {key}");
        let value = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("Failed to write key: {key}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush store to disk")?;
        debug!("Store PUT for key: {key}");
        Ok(())
    }
}
