use super::ui;
use crate::core::Dashboard;
use crate::core::analytics::{HistoricalPoint, OverallHealth};
use comfy_table::{Cell, CellAlignment};

/// Daily totals listed when `--series` is given without a count.
pub const DEFAULT_SERIES_POINTS: usize = 7;

/// Label for the portfolio health score.
pub fn health_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "EXCELLENT"
    } else if score >= 60.0 {
        "GOOD"
    } else if score >= 40.0 {
        "WARNING"
    } else {
        "CRITICAL"
    }
}

pub fn render_overview(health: &OverallHealth, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Revenue ({currency})")),
        ui::header_cell(&format!("Costs ({currency})")),
        ui::header_cell(&format!("Net Profit ({currency})")),
        ui::header_cell("Margin"),
        ui::header_cell("Health"),
        ui::header_cell("Trend"),
    ]);
    table.add_row(vec![
        ui::number_cell(health.total_revenue),
        ui::number_cell(health.total_expenses),
        ui::money_cell(health.total_net_profit),
        ui::change_cell(health.profit_margin),
        Cell::new(format!(
            "{:.0}/100 {}",
            health.health_score,
            health_label(health.health_score)
        )),
        Cell::new(ui::trend_text(health.trend)),
    ]);

    format!(
        "{}\n\n{}",
        ui::style_text("Portfolio Overview", ui::StyleType::Title),
        table
    )
}

pub fn render_businesses(dashboard: &Dashboard, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Business"),
        ui::header_cell("Entries"),
        ui::header_cell(&format!("Total Profit ({currency})")),
        ui::header_cell("This Week"),
        ui::header_cell("Weekly Growth"),
        ui::header_cell("Last 30 Days"),
        ui::header_cell("Status"),
    ]);

    for ledger in dashboard.portfolio().iter() {
        let metrics = dashboard.get_business_metrics(ledger.id());
        table.add_row(vec![
            Cell::new(ledger.business().name),
            Cell::new(ledger.entries().len()).set_alignment(CellAlignment::Right),
            ui::money_cell(ledger.totals().total_net_profit),
            ui::money_cell(metrics.current_week),
            ui::change_cell(metrics.weekly_growth),
            ui::money_cell(metrics.month_to_date),
            ui::status_cell(metrics.health_status),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Businesses", ui::StyleType::Title),
        table
    )
}

/// Renders the most recent `limit` points of the series, oldest first.
pub fn render_series(series: &[HistoricalPoint], currency: &str, limit: usize) -> String {
    let title = ui::style_text("Daily Totals", ui::StyleType::Title);
    let series = &series[series.len().saturating_sub(limit)..];
    if series.is_empty() {
        return format!(
            "{title}\n\n{}",
            ui::style_text("No entries recorded yet.", ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Revenue ({currency})")),
        ui::header_cell(&format!("Net Profit ({currency})")),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            ui::number_cell(point.total_revenue),
            ui::money_cell(point.total_net_profit),
        ]);
    }
    format!("{title}\n\n{table}")
}

pub fn run(dashboard: &Dashboard, currency: &str, series_points: Option<usize>) {
    let health = dashboard.get_overall_health();

    println!("{}", render_overview(&health, currency));
    ui::print_separator();
    println!("{}", render_businesses(dashboard, currency));
    if let Some(limit) = series_points {
        ui::print_separator();
        println!("{}", render_series(&health.historical_data, currency, limit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::Trend;
    use chrono::NaiveDate;

    #[test]
    fn test_health_label() {
        assert_eq!(health_label(100.0), "EXCELLENT");
        assert_eq!(health_label(80.0), "EXCELLENT");
        assert_eq!(health_label(60.0), "GOOD");
        assert_eq!(health_label(50.0), "WARNING");
        assert_eq!(health_label(39.9), "CRITICAL");
    }

    #[test]
    fn test_render_overview_contains_totals() {
        let health = OverallHealth {
            total_revenue: 1500.0,
            total_net_profit: 400.0,
            total_expenses: 1100.0,
            health_score: 90.0,
            trend: Trend::Up,
            profit_margin: 26.67,
            historical_data: Vec::new(),
        };
        let output = render_overview(&health, "USD");
        assert!(output.contains("Revenue (USD)"));
        assert!(output.contains("1500.00"));
        assert!(output.contains("400.00"));
        assert!(output.contains("90/100 EXCELLENT"));
    }

    #[test]
    fn test_render_series() {
        assert!(render_series(&[], "USD", DEFAULT_SERIES_POINTS).contains("No entries recorded yet."));

        let series = vec![HistoricalPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            total_net_profit: 200.0,
            total_revenue: 220.0,
        }];
        let output = render_series(&series, "EUR", DEFAULT_SERIES_POINTS);
        assert!(output.contains("2024-01-08"));
        assert!(output.contains("220.00"));
        assert!(output.contains("Net Profit (EUR)"));
    }

    #[test]
    fn test_render_series_keeps_latest_points() {
        let series: Vec<HistoricalPoint> = (1..=10)
            .map(|day| HistoricalPoint {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                total_net_profit: day as f64,
                total_revenue: day as f64,
            })
            .collect();

        let output = render_series(&series, "USD", DEFAULT_SERIES_POINTS);
        assert!(!output.contains("2024-03-03"));
        assert!(output.contains("2024-03-04"));
        assert!(output.contains("2024-03-10"));

        let output = render_series(&series, "USD", 2);
        assert!(!output.contains("2024-03-08"));
        assert!(output.contains("2024-03-09"));

        let output = render_series(&series, "USD", 50);
        assert!(output.contains("2024-03-01"));
    }
}
