//! Derived metrics over ledgers: windowed profit per business and portfolio health.
//!
//! Everything here is a pure function of its inputs.
use crate::core::entry::Entry;
use crate::core::ledger::{BusinessLedger, Portfolio};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const EXCELLENT_PROFIT: f64 = 5000.0;
const GOOD_PROFIT: f64 = 2500.0;
const BASE_HEALTH_SCORE: f64 = 50.0;
const TREND_BAND: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Classifies an all-time net profit.
    pub fn from_profit(total_net_profit: f64) -> Self {
        if total_net_profit > EXCELLENT_PROFIT {
            HealthStatus::Excellent
        } else if total_net_profit > GOOD_PROFIT {
            HealthStatus::Good
        } else if total_net_profit > 0.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    pub current_week: f64,
    pub previous_week: f64,
    pub month_to_date: f64,
    pub weekly_growth: f64,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub total_net_profit: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallHealth {
    pub total_revenue: f64,
    pub total_net_profit: f64,
    /// Salaries plus expenses across all businesses.
    pub total_expenses: f64,
    pub health_score: f64,
    pub trend: Trend,
    pub profit_margin: f64,
    pub historical_data: Vec<HistoricalPoint>,
}

/// Entry dates count from midnight UTC.
fn entry_instant(entry: &Entry) -> DateTime<Utc> {
    entry.date().and_time(NaiveTime::MIN).and_utc()
}

fn profit_between(
    ledger: &BusinessLedger,
    from: DateTime<Utc>,
    until: Option<DateTime<Utc>>,
) -> f64 {
    ledger
        .entries()
        .iter()
        .filter(|entry| {
            let at = entry_instant(entry);
            at >= from && until.is_none_or(|until| at < until)
        })
        .map(Entry::net_profit)
        .sum()
}

/// Percentage change from the previous week. Zero unless the previous week was profitable.
pub fn weekly_growth(current_week: f64, previous_week: f64) -> f64 {
    if previous_week > 0.0 {
        (current_week - previous_week) / previous_week * 100.0
    } else {
        0.0
    }
}

pub fn business_metrics(ledger: &BusinessLedger, now: DateTime<Utc>) -> BusinessMetrics {
    let week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);
    let month_ago = now - Duration::days(30);

    let current_week = profit_between(ledger, week_ago, None);
    let previous_week = profit_between(ledger, two_weeks_ago, Some(week_ago));
    let month_to_date = profit_between(ledger, month_ago, None);

    BusinessMetrics {
        current_week,
        previous_week,
        month_to_date,
        weekly_growth: weekly_growth(current_week, previous_week),
        health_status: HealthStatus::from_profit(ledger.totals().total_net_profit),
    }
}

/// Merges every entry of every ledger into one point per date, ascending.
pub fn historical_series(portfolio: &Portfolio) -> Vec<HistoricalPoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for entry in portfolio.iter().flat_map(|ledger| ledger.entries()) {
        let point = by_date.entry(entry.date()).or_insert((0.0, 0.0));
        point.0 += entry.net_profit();
        point.1 += entry.revenue();
    }

    by_date
        .into_iter()
        .map(|(date, (total_net_profit, total_revenue))| HistoricalPoint {
            date,
            total_net_profit,
            total_revenue,
        })
        .collect()
}

/// Compares the last two points of the series.
pub fn trend(series: &[HistoricalPoint]) -> Trend {
    match series {
        [.., previous, latest] => {
            let (previous, latest) = (previous.total_net_profit, latest.total_net_profit);
            if latest > previous * (1.0 + TREND_BAND) {
                Trend::Up
            } else if latest < previous * (1.0 - TREND_BAND) {
                Trend::Down
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

pub fn health_score(total_revenue: f64, total_net_profit: f64, total_expenses: f64) -> f64 {
    let margin = profit_margin(total_revenue, total_net_profit);

    let mut score = BASE_HEALTH_SCORE;
    if total_net_profit > 0.0 {
        score += 30.0;
    }
    // Both margin bonuses apply above 20%.
    if margin > 20.0 {
        score += 20.0;
    }
    if margin > 10.0 {
        score += 10.0;
    }
    if total_revenue > total_expenses {
        score += 10.0;
    }
    score.clamp(0.0, 100.0)
}

pub fn profit_margin(total_revenue: f64, total_net_profit: f64) -> f64 {
    if total_revenue > 0.0 {
        total_net_profit / total_revenue * 100.0
    } else {
        0.0
    }
}

pub fn overall_health(portfolio: &Portfolio) -> OverallHealth {
    let mut total_revenue = 0.0;
    let mut total_net_profit = 0.0;
    let mut total_expenses = 0.0;
    for ledger in portfolio.iter() {
        let totals = ledger.totals();
        total_revenue += totals.total_revenue;
        total_net_profit += totals.total_net_profit;
        total_expenses += totals.total_salaries + totals.total_expenses;
    }

    let historical_data = historical_series(portfolio);

    OverallHealth {
        total_revenue,
        total_net_profit,
        total_expenses,
        health_score: health_score(total_revenue, total_net_profit, total_expenses),
        trend: trend(&historical_data),
        profit_margin: profit_margin(total_revenue, total_net_profit),
        historical_data,
    }
}
