//! Reads and writes the whole portfolio, and the bounded snapshot history, through
//! a [`KeyValueStore`].
use crate::core::ledger::Portfolio;
use crate::core::migration::{decode_portfolio, load_portfolio};
use crate::core::storage::KeyValueStore;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

pub const STATE_KEY: &str = "polymath-dashboard-data";
pub const HISTORY_KEY: &str = "polymath-dashboard-history";
/// One year of weekly saves.
pub const HISTORY_CAPACITY: usize = 52;

pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the stored portfolio. Unreadable storage or payloads yield an empty one.
    pub fn load_portfolio(&self) -> Portfolio {
        match self.store.get(STATE_KEY) {
            Ok(payload) => load_portfolio(payload.as_deref()),
            Err(e) => {
                warn!("Failed to read stored portfolio: {e:#}");
                Portfolio::empty()
            }
        }
    }

    /// Writes the entire portfolio under a single key.
    pub fn save_portfolio(&self, portfolio: &Portfolio) -> Result<()> {
        let payload = serde_json::to_string(portfolio).context("Failed to serialize portfolio")?;
        self.store
            .set(STATE_KEY, &payload)
            .context("Failed to save portfolio")?;
        debug!(bytes = payload.len(), "Saved portfolio");
        Ok(())
    }

    /// Loads snapshot history, oldest first. Snapshots that cannot be decoded are dropped.
    pub fn load_history(&self) -> Vec<Portfolio> {
        let payload = match self.store.get(HISTORY_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read snapshot history: {e:#}");
                return Vec::new();
            }
        };

        let snapshots = match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Array(snapshots)) => snapshots,
            Ok(_) | Err(_) => {
                warn!("Discarding unreadable snapshot history");
                return Vec::new();
            }
        };

        let mut history: Vec<Portfolio> = snapshots
            .iter()
            .enumerate()
            .filter_map(|(i, snapshot)| match decode_portfolio(snapshot) {
                Ok(portfolio) => Some(portfolio),
                Err(e) => {
                    warn!("Dropping snapshot {i}: {e:#}");
                    None
                }
            })
            .collect();
        evict_oldest(&mut history);
        history
    }

    /// Appends `portfolio` to `history`, evicting the oldest snapshots beyond
    /// [`HISTORY_CAPACITY`], then writes the history. `history` is updated even if
    /// the write fails.
    pub fn commit_snapshot(&self, history: &mut Vec<Portfolio>, portfolio: &Portfolio) -> Result<()> {
        history.push(portfolio.clone());
        evict_oldest(history);

        let payload = serde_json::to_string(history).context("Failed to serialize history")?;
        self.store
            .set(HISTORY_KEY, &payload)
            .context("Failed to save snapshot history")?;
        debug!(snapshots = history.len(), "Committed snapshot");
        Ok(())
    }
}

fn evict_oldest(history: &mut Vec<Portfolio>) {
    if history.len() > HISTORY_CAPACITY {
        let excess = history.len() - HISTORY_CAPACITY;
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::Entry;
    use crate::core::registry::BusinessId;
    use crate::store::memory::MemoryStore;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::sync::Arc;

    /// Shares one memory store between the gateway and the test.
    struct SharedStore(Arc<MemoryStore>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.set(key, value)
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn portfolio_with_revenue(revenue: f64) -> Portfolio {
        let mut portfolio = Portfolio::empty();
        portfolio.ledger_mut(BusinessId::IClean).append(Entry::with_amounts(
            BusinessId::IClean,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            revenue,
            0.0,
            0.0,
        ));
        portfolio
    }

    #[test]
    fn test_save_and_load_portfolio() {
        let shared = Arc::new(MemoryStore::new());
        let gateway = PersistenceGateway::new(Box::new(SharedStore(Arc::clone(&shared))));

        assert_eq!(gateway.load_portfolio(), Portfolio::empty());

        let portfolio = portfolio_with_revenue(250.0);
        gateway.save_portfolio(&portfolio).unwrap();
        assert_eq!(gateway.load_portfolio(), portfolio);

        let raw = shared.get(STATE_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert_eq!(value[0]["totalRevenue"], 250.0);
    }

    #[test]
    fn test_history_is_capped() {
        let gateway = PersistenceGateway::new(Box::new(MemoryStore::new()));
        let mut history = Vec::new();

        for i in 0..(HISTORY_CAPACITY + 1) {
            gateway
                .commit_snapshot(&mut history, &portfolio_with_revenue(i as f64))
                .unwrap();
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        // The first snapshot (revenue 0) was evicted.
        let first = history[0].ledger(BusinessId::IClean).totals().total_revenue;
        assert_eq!(first, 1.0);

        let reloaded = gateway.load_history();
        assert_eq!(reloaded, history);
    }

    #[test]
    fn test_load_history_drops_bad_snapshots() {
        let store = MemoryStore::new();
        store
            .set(HISTORY_KEY, r#"[[{"id": "iclean", "entries": []}], "junk", []]"#)
            .unwrap();
        let gateway = PersistenceGateway::new(Box::new(store));

        let history = gateway.load_history();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|p| *p == Portfolio::empty()));
    }

    #[test]
    fn test_load_history_oversized_keeps_newest() {
        let store = MemoryStore::new();
        let snapshots: Vec<Portfolio> = (0..60).map(|i| portfolio_with_revenue(i as f64)).collect();
        store
            .set(HISTORY_KEY, &serde_json::to_string(&snapshots).unwrap())
            .unwrap();
        let gateway = PersistenceGateway::new(Box::new(store));

        let history = gateway.load_history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(
            history[0].ledger(BusinessId::IClean).totals().total_revenue,
            8.0
        );
    }

    #[test]
    fn test_broken_store() {
        let gateway = PersistenceGateway::new(Box::new(BrokenStore));
        assert_eq!(gateway.load_portfolio(), Portfolio::empty());
        assert!(gateway.load_history().is_empty());

        let err = gateway.save_portfolio(&Portfolio::empty()).unwrap_err();
        assert!(err.to_string().contains("Failed to save portfolio"));

        let mut history = Vec::new();
        assert!(
            gateway
                .commit_snapshot(&mut history, &Portfolio::empty())
                .is_err()
        );
        assert_eq!(history.len(), 1);
    }
}
