//! A single dated measurement for one business unit.
//!
//! Net profit is always derived from revenue, salaries and expenses. There is no
//! way to set it directly: constructors and [`Entry::apply`] recompute it.
use crate::core::coerce::{lenient_number, lenient_optional_number, lenient_optional_text};
use crate::core::registry::{BusinessId, ExtraField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Business-specific fields, selected by the business's field schema.
#[derive(Debug, Clone, PartialEq)]
pub enum BusinessDetails {
    Clean {
        clients: Option<f64>,
        hours: Option<f64>,
    },
    Candy {
        clients: Option<f64>,
        hours: Option<f64>,
        investor: Option<f64>,
    },
    Logistics {
        items: Option<String>,
        investor: Option<f64>,
    },
    Music {
        video: Option<f64>,
        promotion: Option<f64>,
    },
    Fund {
        transactions: Option<f64>,
    },
}

impl BusinessDetails {
    pub fn empty(business: BusinessId) -> Self {
        match business {
            BusinessId::IClean => BusinessDetails::Clean {
                clients: None,
                hours: None,
            },
            BusinessId::ICandy => BusinessDetails::Candy {
                clients: None,
                hours: None,
                investor: None,
            },
            BusinessId::Apl => BusinessDetails::Logistics {
                items: None,
                investor: None,
            },
            BusinessId::Apmg => BusinessDetails::Music {
                video: None,
                promotion: None,
            },
            BusinessId::InstaFund => BusinessDetails::Fund { transactions: None },
        }
    }

    pub fn business(&self) -> BusinessId {
        match self {
            BusinessDetails::Clean { .. } => BusinessId::IClean,
            BusinessDetails::Candy { .. } => BusinessId::ICandy,
            BusinessDetails::Logistics { .. } => BusinessId::Apl,
            BusinessDetails::Music { .. } => BusinessId::Apmg,
            BusinessDetails::Fund { .. } => BusinessId::InstaFund,
        }
    }

    /// Returns a numeric extra field, or `None` if unset or not part of this schema.
    pub fn number(&self, field: ExtraField) -> Option<f64> {
        use BusinessDetails::*;
        match (self, field) {
            (Clean { clients, .. } | Candy { clients, .. }, ExtraField::Clients) => *clients,
            (Clean { hours, .. } | Candy { hours, .. }, ExtraField::Hours) => *hours,
            (Candy { investor, .. } | Logistics { investor, .. }, ExtraField::Investor) => {
                *investor
            }
            (Music { video, .. }, ExtraField::Video) => *video,
            (Music { promotion, .. }, ExtraField::Promotion) => *promotion,
            (Fund { transactions }, ExtraField::Transactions) => *transactions,
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&str> {
        match self {
            BusinessDetails::Logistics { items, .. } => items.as_deref(),
            _ => None,
        }
    }

    fn number_slot(&mut self, field: ExtraField) -> Option<&mut Option<f64>> {
        use BusinessDetails::*;
        match (self, field) {
            (Clean { clients, .. } | Candy { clients, .. }, ExtraField::Clients) => Some(clients),
            (Clean { hours, .. } | Candy { hours, .. }, ExtraField::Hours) => Some(hours),
            (Candy { investor, .. } | Logistics { investor, .. }, ExtraField::Investor) => {
                Some(investor)
            }
            (Music { video, .. }, ExtraField::Video) => Some(video),
            (Music { promotion, .. }, ExtraField::Promotion) => Some(promotion),
            (Fund { transactions }, ExtraField::Transactions) => Some(transactions),
            _ => None,
        }
    }

    fn from_record(business: BusinessId, record: &EntryRecord) -> Self {
        let mut details = Self::empty(business);
        for field in business.extra_fields() {
            if let Some(slot) = details.number_slot(*field) {
                *slot = record.number(*field);
            }
        }
        if let BusinessDetails::Logistics { items, .. } = &mut details {
            *items = record.items.clone();
        }
        details
    }

    fn write_to(&self, record: &mut EntryRecord) {
        for field in self.business().extra_fields() {
            if let Some(slot) = record.number_slot(*field) {
                *slot = self.number(*field);
            }
        }
        record.items = self.items().map(str::to_string);
    }
}

/// A stored measurement. Serialises to the flat persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "EntryRecord")]
pub struct Entry {
    date: NaiveDate,
    revenue: f64,
    salaries: f64,
    expenses: f64,
    net_profit: f64,
    details: BusinessDetails,
    notes: String,
}

impl Entry {
    /// A zero-valued entry with empty notes.
    pub fn new(business: BusinessId, date: NaiveDate) -> Self {
        Self {
            date,
            revenue: 0.0,
            salaries: 0.0,
            expenses: 0.0,
            net_profit: 0.0,
            details: BusinessDetails::empty(business),
            notes: String::new(),
        }
    }

    /// Builds an entry from the three money fields, deriving net profit.
    pub fn with_amounts(
        business: BusinessId,
        date: NaiveDate,
        revenue: f64,
        salaries: f64,
        expenses: f64,
    ) -> Self {
        let mut entry = Self::new(business, date);
        entry.revenue = revenue;
        entry.salaries = salaries;
        entry.expenses = expenses;
        entry.recompute_profit();
        entry
    }

    /// Decodes a persisted record for `business`. Any stored net profit is ignored
    /// and extra fields outside the business's schema are dropped.
    pub fn from_record(record: &EntryRecord, business: BusinessId) -> Self {
        let mut entry = Self {
            date: record.date,
            revenue: record.revenue,
            salaries: record.salaries,
            expenses: record.expenses,
            net_profit: 0.0,
            details: BusinessDetails::from_record(business, record),
            notes: record.notes.clone().unwrap_or_default(),
        };
        entry.recompute_profit();
        entry
    }

    /// Overlays the set fields of `update` and recomputes net profit.
    pub fn apply(&mut self, update: &EntryUpdate) {
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(revenue) = update.revenue {
            self.revenue = revenue;
        }
        if let Some(salaries) = update.salaries {
            self.salaries = salaries;
        }
        if let Some(expenses) = update.expenses {
            self.expenses = expenses;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }

        let business = self.business();
        for (field, value) in update.numbers() {
            match self.details.number_slot(field) {
                Some(slot) => *slot = Some(value),
                None => warn!(
                    business = %business,
                    field = field.name(),
                    "Ignoring field not recorded by this business"
                ),
            }
        }
        if let Some(text) = &update.items {
            match &mut self.details {
                BusinessDetails::Logistics { items, .. } => *items = Some(text.clone()),
                _ => warn!(
                    business = %business,
                    field = ExtraField::Items.name(),
                    "Ignoring field not recorded by this business"
                ),
            }
        }

        self.recompute_profit();
    }

    /// Same entry re-keyed to another business; shared extra fields are kept.
    pub fn retarget(&self, business: BusinessId) -> Self {
        if self.business() == business {
            return self.clone();
        }
        Self::from_record(&EntryRecord::from(self.clone()), business)
    }

    fn recompute_profit(&mut self) {
        self.net_profit = self.revenue - self.salaries - self.expenses;
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn salaries(&self) -> f64 {
        self.salaries
    }

    pub fn expenses(&self) -> f64 {
        self.expenses
    }

    pub fn net_profit(&self) -> f64 {
        self.net_profit
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn details(&self) -> &BusinessDetails {
        &self.details
    }

    pub fn business(&self) -> BusinessId {
        self.details.business()
    }
}

/// A partial update. Unset fields leave the target entry unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub date: Option<NaiveDate>,
    pub revenue: Option<f64>,
    pub salaries: Option<f64>,
    pub expenses: Option<f64>,
    pub clients: Option<f64>,
    pub hours: Option<f64>,
    pub investor: Option<f64>,
    pub items: Option<String>,
    pub video: Option<f64>,
    pub promotion: Option<f64>,
    pub transactions: Option<f64>,
    pub notes: Option<String>,
}

impl EntryUpdate {
    fn numbers(&self) -> impl Iterator<Item = (ExtraField, f64)> {
        [
            (ExtraField::Clients, self.clients),
            (ExtraField::Hours, self.hours),
            (ExtraField::Investor, self.investor),
            (ExtraField::Video, self.video),
            (ExtraField::Promotion, self.promotion),
            (ExtraField::Transactions, self.transactions),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Flat persisted form of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_number")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salaries: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub expenses: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub net_profit: f64,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub clients: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub investor: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub video: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub promotion: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub transactions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub notes: Option<String>,
}

impl EntryRecord {
    fn number(&self, field: ExtraField) -> Option<f64> {
        match field {
            ExtraField::Clients => self.clients,
            ExtraField::Hours => self.hours,
            ExtraField::Investor => self.investor,
            ExtraField::Video => self.video,
            ExtraField::Promotion => self.promotion,
            ExtraField::Transactions => self.transactions,
            ExtraField::Items => None,
        }
    }

    fn number_slot(&mut self, field: ExtraField) -> Option<&mut Option<f64>> {
        match field {
            ExtraField::Clients => Some(&mut self.clients),
            ExtraField::Hours => Some(&mut self.hours),
            ExtraField::Investor => Some(&mut self.investor),
            ExtraField::Video => Some(&mut self.video),
            ExtraField::Promotion => Some(&mut self.promotion),
            ExtraField::Transactions => Some(&mut self.transactions),
            ExtraField::Items => None,
        }
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        let mut record = EntryRecord {
            date: entry.date,
            revenue: entry.revenue,
            salaries: entry.salaries,
            expenses: entry.expenses,
            net_profit: entry.net_profit,
            clients: None,
            hours: None,
            investor: None,
            items: None,
            video: None,
            promotion: None,
            transactions: None,
            notes: Some(entry.notes.clone()),
        };
        entry.details.write_to(&mut record);
        record
    }
}
