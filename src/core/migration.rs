//! Decodes persisted portfolio payloads, including the older single-entry shape.
//!
//! Each stored record is classified as one of three shapes:
//! - current: carries an `entries` array
//! - legacy: a single flattened entry with a `date`
//! - empty: neither of the above
//!
//! Loading never fails. A record or entry that cannot be decoded is dropped on its
//! own; only a payload that is not a JSON array yields an empty portfolio.
use crate::core::entry::{Entry, EntryRecord};
use crate::core::ledger::{BusinessLedger, Portfolio};
use crate::core::registry::BusinessId;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, warn};

/// A stored ledger record after shape classification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawLedger {
    Current {
        id: BusinessId,
        entries: Vec<EntryRecord>,
    },
    Legacy {
        id: BusinessId,
        entry: EntryRecord,
    },
    Empty {
        id: BusinessId,
    },
}

impl RawLedger {
    /// Classifies one stored record. Returns `Ok(None)` for records whose id is not
    /// a registered business.
    pub fn decode(value: &Value) -> Result<Option<Self>> {
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("Ledger record is not an object"))?;
        let raw_id = object
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Ledger record has no id"))?;
        let id = match raw_id.parse::<BusinessId>() {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping stored ledger: {e}");
                return Ok(None);
            }
        };

        if let Some(entries) = object.get("entries").and_then(Value::as_array) {
            let entries = entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    serde_json::from_value::<EntryRecord>(entry.clone())
                        .map_err(|e| warn!(business = %id, index, "Dropping stored entry: {e}"))
                        .ok()
                })
                .collect();
            return Ok(Some(RawLedger::Current { id, entries }));
        }

        let has_date = object
            .get("date")
            .and_then(Value::as_str)
            .is_some_and(|d| !d.is_empty());
        if has_date {
            let entry: EntryRecord = serde_json::from_value(value.clone())
                .with_context(|| format!("Failed to decode legacy entry for {id}"))?;
            return Ok(Some(RawLedger::Legacy { id, entry }));
        }

        Ok(Some(RawLedger::Empty { id }))
    }

    pub fn into_ledger(self) -> BusinessLedger {
        match self {
            RawLedger::Current { id, entries } => BusinessLedger::from_entries(
                id,
                entries.iter().map(|r| Entry::from_record(r, id)).collect(),
            ),
            RawLedger::Legacy { id, entry } => {
                debug!(business = %id, "Migrating legacy single-entry record");
                BusinessLedger::from_entries(id, vec![Entry::from_record(&entry, id)])
            }
            RawLedger::Empty { id } => BusinessLedger::new(id),
        }
    }
}

/// Decodes a JSON array of ledger records into a portfolio.
pub fn decode_portfolio(value: &Value) -> Result<Portfolio> {
    let records = value
        .as_array()
        .ok_or_else(|| anyhow!("Stored portfolio is not an array"))?;

    let mut ledgers = Vec::with_capacity(records.len());
    for record in records {
        match RawLedger::decode(record) {
            Ok(Some(raw)) => ledgers.push(raw.into_ledger()),
            Ok(None) => {}
            Err(e) => warn!("Dropping stored ledger: {e:#}"),
        }
    }
    Ok(Portfolio::from_ledgers(ledgers))
}

/// Parses a stored payload, falling back to five empty ledgers when it is not a
/// JSON array.
pub fn load_portfolio(payload: Option<&str>) -> Portfolio {
    let Some(payload) = payload else {
        debug!("No stored portfolio, starting empty");
        return Portfolio::empty();
    };

    let decoded = serde_json::from_str::<Value>(payload)
        .context("Stored portfolio is not valid JSON")
        .and_then(|value| decode_portfolio(&value));

    match decoded {
        Ok(portfolio) => portfolio,
        Err(e) => {
            warn!("Discarding unreadable stored portfolio: {e:#}");
            Portfolio::empty()
        }
    }
}
