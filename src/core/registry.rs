//! The fixed set of business units tracked by the dashboard.
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessId {
    IClean,
    ICandy,
    Apl,
    Apmg,
    InstaFund,
}

/// Optional fields a business records in addition to the base money fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraField {
    Clients,
    Hours,
    Investor,
    Items,
    Video,
    Promotion,
    Transactions,
}

/// Static identity of a business unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: &'static str,
    pub color: &'static str,
}

pub const BUSINESSES: [Business; 5] = [
    Business {
        id: BusinessId::IClean,
        name: "iClean",
        color: "iclean",
    },
    Business {
        id: BusinessId::ICandy,
        name: "iCandy Factory",
        color: "icandy",
    },
    Business {
        id: BusinessId::Apl,
        name: "Angry Panda Logistics",
        color: "apl",
    },
    Business {
        id: BusinessId::Apmg,
        name: "Angry Panda Music Group",
        color: "apmg",
    },
    Business {
        id: BusinessId::InstaFund,
        name: "Insta Fund",
        color: "instafund",
    },
];

impl BusinessId {
    pub const ALL: [BusinessId; 5] = [
        BusinessId::IClean,
        BusinessId::ICandy,
        BusinessId::Apl,
        BusinessId::Apmg,
        BusinessId::InstaFund,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessId::IClean => "iclean",
            BusinessId::ICandy => "icandy",
            BusinessId::Apl => "apl",
            BusinessId::Apmg => "apmg",
            BusinessId::InstaFund => "instafund",
        }
    }

    pub fn business(&self) -> Business {
        BUSINESSES[self.position()]
    }

    /// Position of the business in registry order.
    pub fn position(&self) -> usize {
        match self {
            BusinessId::IClean => 0,
            BusinessId::ICandy => 1,
            BusinessId::Apl => 2,
            BusinessId::Apmg => 3,
            BusinessId::InstaFund => 4,
        }
    }

    pub fn extra_fields(&self) -> &'static [ExtraField] {
        use ExtraField::*;
        match self {
            BusinessId::IClean => &[Clients, Hours],
            BusinessId::ICandy => &[Clients, Hours, Investor],
            BusinessId::Apl => &[Items, Investor],
            BusinessId::Apmg => &[Video, Promotion],
            BusinessId::InstaFund => &[Transactions],
        }
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        BusinessId::ALL
            .into_iter()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| {
                let valid: Vec<&str> = BusinessId::ALL.iter().map(|id| id.as_str()).collect();
                anyhow!("Unknown business '{s}'. Expected one of: {}", valid.join(", "))
            })
    }
}

impl ExtraField {
    pub fn name(&self) -> &'static str {
        match self {
            ExtraField::Clients => "clients",
            ExtraField::Hours => "hours",
            ExtraField::Investor => "investor",
            ExtraField::Items => "items",
            ExtraField::Video => "video",
            ExtraField::Promotion => "promotion",
            ExtraField::Transactions => "transactions",
        }
    }
}
