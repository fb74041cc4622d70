pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::storage::KeyValueStore;
use anyhow::Result;
use disk::DiskStore;
use memory::MemoryStore;
use tracing::warn;

/// A store ready for use, plus a warning when it had to fall back to memory.
pub struct OpenedStore {
    pub store: Box<dyn KeyValueStore>,
    pub warning: Option<String>,
}

/// Opens the configured store. A disk store that cannot be opened degrades to an
/// in-memory store so the dashboard stays usable.
pub fn open(config: &AppConfig) -> OpenedStore {
    match config.storage {
        StorageBackend::Memory => OpenedStore {
            store: Box::new(MemoryStore::new()),
            warning: None,
        },
        StorageBackend::Disk => match open_disk(config) {
            Ok(store) => OpenedStore {
                store: Box::new(store),
                warning: None,
            },
            Err(e) => {
                warn!("Falling back to in-memory storage: {e:#}");
                OpenedStore {
                    store: Box::new(MemoryStore::new()),
                    warning: Some(format!(
                        "Storage unavailable ({e:#}); changes will not be saved"
                    )),
                }
            }
        },
    }
}

fn open_disk(config: &AppConfig) -> Result<DiskStore> {
    let path = config.data_path()?;
    DiskStore::open(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_memory_store() {
        let config = AppConfig {
            storage: StorageBackend::Memory,
            ..Default::default()
        };
        let opened = open(&config);
        assert!(opened.warning.is_none());
        opened.store.set("k", "v").unwrap();
        assert_eq!(opened.store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_open_disk_store_at_custom_path() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let opened = open(&config);
        assert!(opened.warning.is_none());
        assert!(dir.path().join("store").exists());
    }

    #[test]
    fn test_unusable_disk_path_falls_back_to_memory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "occupied").unwrap();

        let config = AppConfig {
            data_path: Some(file.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let opened = open(&config);
        assert!(opened.warning.unwrap().contains("Storage unavailable"));
        opened.store.set("k", "v").unwrap();
    }
}
