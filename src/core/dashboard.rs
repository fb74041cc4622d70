//! The dashboard state store: current portfolio, snapshot history, and the
//! commands and queries a front-end uses.
//!
//! Every command mutates memory first and then writes the whole portfolio through
//! the gateway. A failed write leaves the in-memory state in place, returns the
//! error and is remembered as a storage warning.
use crate::core::analytics::{self, BusinessMetrics, OverallHealth};
use crate::core::entry::{Entry, EntryUpdate};
use crate::core::ledger::Portfolio;
use crate::core::persistence::PersistenceGateway;
use crate::core::registry::BusinessId;
use crate::core::storage::KeyValueStore;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct Dashboard {
    portfolio: Portfolio,
    history: Vec<Portfolio>,
    gateway: PersistenceGateway,
    clock: Box<dyn Clock>,
    storage_warning: Option<String>,
}

impl Dashboard {
    pub fn load(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let gateway = PersistenceGateway::new(store);
        let portfolio = gateway.load_portfolio();
        let history = gateway.load_history();
        info!(snapshots = history.len(), "Dashboard loaded");
        Self {
            portfolio,
            history,
            gateway,
            clock,
            storage_warning: None,
        }
    }

    /// Records a warning to show alongside results, e.g. after falling back to
    /// in-memory storage.
    pub fn with_storage_warning(mut self, warning: Option<String>) -> Self {
        self.storage_warning = warning;
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn history(&self) -> &[Portfolio] {
        &self.history
    }

    pub fn storage_warning(&self) -> Option<&str> {
        self.storage_warning.as_deref()
    }

    /// The record a user edits: the latest entry, or a zeroed one for today.
    pub fn get_current_entry(&self, id: BusinessId) -> Entry {
        self.portfolio.ledger(id).latest_entry(self.clock.today())
    }

    pub fn get_business_metrics(&self, id: BusinessId) -> BusinessMetrics {
        analytics::business_metrics(self.portfolio.ledger(id), self.clock.now())
    }

    pub fn get_overall_health(&self) -> OverallHealth {
        analytics::overall_health(&self.portfolio)
    }

    /// Merges `update` into today's entry for `id`, creating it if needed.
    pub fn update_current_entry(&mut self, id: BusinessId, update: &EntryUpdate) -> Result<()> {
        let today = self.clock.today();
        self.portfolio.ledger_mut(id).upsert_today(update, today);
        self.write_through()
    }

    /// Appends an explicit entry for `id`.
    pub fn add_business_entry(&mut self, id: BusinessId, entry: Entry) -> Result<()> {
        self.portfolio.ledger_mut(id).append(entry);
        self.write_through()
    }

    /// Saves the portfolio and commits it to the snapshot history.
    pub fn save_data(&mut self) -> Result<()> {
        self.write_through()?;
        let result = self
            .gateway
            .commit_snapshot(&mut self.history, &self.portfolio);
        self.note_storage_result(result)
    }

    fn write_through(&mut self) -> Result<()> {
        let result = self.gateway.save_portfolio(&self.portfolio);
        self.note_storage_result(result)
    }

    fn note_storage_result(&mut self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            warn!("Storage write failed, keeping changes in memory: {e:#}");
            self.storage_warning = Some(format!("Changes are not being saved: {e:#}"));
        }
        result
    }
}
