use anyhow::Result;

/// A string key-value medium. Each `set` replaces the whole value for its key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
