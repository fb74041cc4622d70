//! Per-business entry sequences with running totals, and the portfolio of all ledgers.
use crate::core::entry::{Entry, EntryUpdate};
use crate::core::registry::{Business, BusinessId, BUSINESSES};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Running sums over every entry in a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_revenue: f64,
    pub total_salaries: f64,
    pub total_expenses: f64,
    pub total_net_profit: f64,
}

impl Totals {
    fn add(&mut self, entry: &Entry) {
        self.total_revenue += entry.revenue();
        self.total_salaries += entry.salaries();
        self.total_expenses += entry.expenses();
        self.total_net_profit += entry.net_profit();
    }

    pub fn sum<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut totals = Totals::default();
        for entry in entries {
            totals.add(entry);
        }
        totals
    }
}

/// The entries recorded for one business, in append order.
///
/// Entries are not kept sorted by date. [`BusinessLedger::upsert_today`] only ever
/// looks at the *last* entry, so backfilling an older date while a newer one
/// exists appends rather than merging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLedger {
    #[serde(flatten)]
    business: Business,
    entries: Vec<Entry>,
    #[serde(flatten)]
    totals: Totals,
}

impl BusinessLedger {
    pub fn new(id: BusinessId) -> Self {
        Self {
            business: id.business(),
            entries: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// Rebuilds a ledger from already decoded entries. Totals are recomputed.
    pub fn from_entries(id: BusinessId, entries: Vec<Entry>) -> Self {
        let entries: Vec<Entry> = entries.into_iter().map(|e| e.retarget(id)).collect();
        let totals = Totals::sum(&entries);
        Self {
            business: id.business(),
            entries,
            totals,
        }
    }

    /// Appends an entry, adding its contribution to the running totals.
    pub fn append(&mut self, entry: Entry) {
        let entry = entry.retarget(self.id());
        self.totals.add(&entry);
        debug!(
            business = %self.id(),
            date = %entry.date(),
            net_profit = entry.net_profit(),
            "Appended entry"
        );
        self.entries.push(entry);
    }

    /// Merges `update` into the last entry if it is dated `today`; otherwise appends
    /// a fresh zeroed entry for `today` with the update overlaid.
    pub fn upsert_today(&mut self, update: &EntryUpdate, today: NaiveDate) {
        let last_is_today = self.entries.last().is_some_and(|e| e.date() == today);
        if last_is_today {
            if let Some(last) = self.entries.last_mut() {
                last.apply(update);
            }
            self.totals = Totals::sum(&self.entries);
            debug!(business = %self.id(), %today, "Updated today's entry");
        } else {
            let mut entry = Entry::new(self.id(), today);
            entry.apply(update);
            self.append(entry);
        }
    }

    /// The last entry, or a zeroed entry dated `today` if the ledger is empty.
    pub fn latest_entry(&self, today: NaiveDate) -> Entry {
        self.entries
            .last()
            .cloned()
            .unwrap_or_else(|| Entry::new(self.id(), today))
    }

    pub fn id(&self) -> BusinessId {
        self.business.id
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }
}

/// One ledger per registered business, always in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Portfolio {
    ledgers: Vec<BusinessLedger>,
}

impl Portfolio {
    pub fn empty() -> Self {
        Self {
            ledgers: BUSINESSES.iter().map(|b| BusinessLedger::new(b.id)).collect(),
        }
    }

    /// Builds a portfolio from decoded ledgers. Missing businesses get an empty
    /// ledger; if a business appears more than once the last one wins.
    pub fn from_ledgers(ledgers: impl IntoIterator<Item = BusinessLedger>) -> Self {
        let mut portfolio = Self::empty();
        for ledger in ledgers {
            let slot = ledger.id().position();
            portfolio.ledgers[slot] = ledger;
        }
        portfolio
    }

    pub fn ledger(&self, id: BusinessId) -> &BusinessLedger {
        &self.ledgers[id.position()]
    }

    pub fn ledger_mut(&mut self, id: BusinessId) -> &mut BusinessLedger {
        &mut self.ledgers[id.position()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusinessLedger> {
        self.ledgers.iter()
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ExtraField;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn assert_totals_match_entries(ledger: &BusinessLedger) {
        let recomputed = Totals::sum(ledger.entries());
        let totals = ledger.totals();
        assert!((totals.total_revenue - recomputed.total_revenue).abs() < 1e-9);
        assert!((totals.total_salaries - recomputed.total_salaries).abs() < 1e-9);
        assert!((totals.total_expenses - recomputed.total_expenses).abs() < 1e-9);
        assert!((totals.total_net_profit - recomputed.total_net_profit).abs() < 1e-9);
        for entry in ledger.entries() {
            assert_eq!(
                entry.net_profit(),
                entry.revenue() - entry.salaries() - entry.expenses()
            );
        }
    }

    #[test]
    fn test_append_updates_totals() {
        let mut ledger = BusinessLedger::new(BusinessId::IClean);
        ledger.append(Entry::with_amounts(BusinessId::IClean, date("2024-01-01"), 1000.0, 200.0, 300.0));
        ledger.append(Entry::with_amounts(BusinessId::IClean, date("2024-01-02"), 50.0, 0.0, 80.0));

        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(
            *ledger.totals(),
            Totals {
                total_revenue: 1050.0,
                total_salaries: 200.0,
                total_expenses: 380.0,
                total_net_profit: 470.0,
            }
        );
    }

    #[test]
    fn test_upsert_today_twice_keeps_one_entry() {
        let today = date("2024-05-10");
        let mut ledger = BusinessLedger::new(BusinessId::ICandy);

        ledger.upsert_today(
            &EntryUpdate {
                revenue: Some(800.0),
                salaries: Some(100.0),
                ..Default::default()
            },
            today,
        );
        ledger.upsert_today(
            &EntryUpdate {
                revenue: Some(600.0),
                investor: Some(1.0),
                ..Default::default()
            },
            today,
        );

        assert_eq!(ledger.entries().len(), 1);
        let entry = &ledger.entries()[0];
        assert_eq!(entry.date(), today);
        // Second revenue replaces the first; salaries survive from the first call.
        assert_eq!(entry.revenue(), 600.0);
        assert_eq!(entry.salaries(), 100.0);
        assert_eq!(entry.net_profit(), 500.0);
        assert_eq!(entry.details().number(ExtraField::Investor), Some(1.0));
        assert_eq!(ledger.totals().total_net_profit, 500.0);
        assert_totals_match_entries(&ledger);
    }

    #[test]
    fn test_upsert_new_day_appends_zeroed_entry() {
        let mut ledger = BusinessLedger::new(BusinessId::Apmg);
        ledger.append(Entry::with_amounts(BusinessId::Apmg, date("2024-05-09"), 100.0, 10.0, 10.0));

        ledger.upsert_today(
            &EntryUpdate {
                expenses: Some(25.0),
                ..Default::default()
            },
            date("2024-05-10"),
        );

        assert_eq!(ledger.entries().len(), 2);
        let latest = &ledger.entries()[1];
        assert_eq!(latest.date(), date("2024-05-10"));
        assert_eq!(latest.revenue(), 0.0);
        assert_eq!(latest.net_profit(), -25.0);
        assert_eq!(latest.notes(), "");
        assert_eq!(ledger.totals().total_net_profit, 55.0);
        assert_totals_match_entries(&ledger);
    }

    #[test]
    fn test_upsert_on_empty_ledger_appends() {
        let mut ledger = BusinessLedger::new(BusinessId::InstaFund);
        ledger.upsert_today(&EntryUpdate::default(), date("2024-05-10"));
        assert_eq!(ledger.entries().len(), 1);
        assert_eq!(ledger.totals(), &Totals::default());
    }

    #[test]
    fn test_upsert_only_inspects_last_entry() {
        // A backfilled past date sits after a later date; upserting "today" with
        // the later date does not find the earlier-positioned entry.
        let mut ledger = BusinessLedger::new(BusinessId::Apl);
        ledger.append(Entry::with_amounts(BusinessId::Apl, date("2024-05-10"), 100.0, 0.0, 0.0));
        ledger.append(Entry::with_amounts(BusinessId::Apl, date("2024-05-01"), 40.0, 0.0, 0.0));

        ledger.upsert_today(
            &EntryUpdate {
                revenue: Some(10.0),
                ..Default::default()
            },
            date("2024-05-10"),
        );

        let dates: Vec<NaiveDate> = ledger.entries().iter().map(|e| e.date()).collect();
        assert_eq!(
            dates,
            vec![date("2024-05-10"), date("2024-05-01"), date("2024-05-10")]
        );
        assert_eq!(ledger.entries()[0].revenue(), 100.0);
        assert_eq!(ledger.totals().total_revenue, 150.0);
        assert_totals_match_entries(&ledger);
    }

    #[test]
    fn test_mixed_operations_never_drift() {
        let mut ledger = BusinessLedger::new(BusinessId::IClean);
        let days = ["2024-02-01", "2024-02-01", "2024-02-02", "2024-02-02", "2024-02-03"];
        for (i, day) in days.iter().enumerate() {
            let amount = (i as f64 + 1.0) * 33.3;
            if i % 2 == 0 {
                ledger.upsert_today(
                    &EntryUpdate {
                        revenue: Some(amount),
                        salaries: Some(amount / 3.0),
                        ..Default::default()
                    },
                    date(day),
                );
            } else {
                ledger.append(Entry::with_amounts(BusinessId::IClean, date(day), amount, 1.5, 2.5));
            }
            assert_totals_match_entries(&ledger);
        }
    }

    #[test]
    fn test_latest_entry() {
        let today = date("2024-05-10");
        let mut ledger = BusinessLedger::new(BusinessId::IClean);
        let synthetic = ledger.latest_entry(today);
        assert_eq!(synthetic.date(), today);
        assert_eq!(synthetic.revenue(), 0.0);
        assert!(ledger.entries().is_empty());

        ledger.append(Entry::with_amounts(BusinessId::IClean, date("2024-05-01"), 5.0, 1.0, 1.0));
        assert_eq!(ledger.latest_entry(today).date(), date("2024-05-01"));
    }

    #[test]
    fn test_append_retargets_foreign_entry() {
        let mut ledger = BusinessLedger::new(BusinessId::Apmg);
        ledger.append(Entry::new(BusinessId::IClean, date("2024-05-01")));
        assert_eq!(ledger.entries()[0].business(), BusinessId::Apmg);
    }

    #[test]
    fn test_portfolio_in_registry_order() {
        let portfolio = Portfolio::from_ledgers(vec![
            BusinessLedger::new(BusinessId::InstaFund),
            BusinessLedger::new(BusinessId::IClean),
        ]);
        let ids: Vec<BusinessId> = portfolio.iter().map(|l| l.id()).collect();
        assert_eq!(ids, BusinessId::ALL.to_vec());
    }

    #[test]
    fn test_ledger_serializes_persisted_shape() {
        let mut ledger = BusinessLedger::new(BusinessId::IClean);
        ledger.append(Entry::with_amounts(BusinessId::IClean, date("2024-01-01"), 1000.0, 200.0, 300.0));

        let value = serde_json::to_value(&ledger).unwrap();
        assert_eq!(value["id"], "iclean");
        assert_eq!(value["name"], "iClean");
        assert_eq!(value["color"], "iclean");
        assert_eq!(value["entries"][0]["netProfit"], 500.0);
        assert_eq!(value["totalRevenue"], 1000.0);
        assert_eq!(value["totalSalaries"], 200.0);
        assert_eq!(value["totalExpenses"], 300.0);
        assert_eq!(value["totalNetProfit"], 500.0);
    }
}
