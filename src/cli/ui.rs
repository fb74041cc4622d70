use crate::core::analytics::{HealthStatus, Trend};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned amount, green when non-negative and red otherwise.
pub fn money_cell(amount: f64) -> Cell {
    let color = if amount >= 0.0 { Color::Green } else { Color::Red };
    Cell::new(format!("{amount:.2}"))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Right-aligned plain number.
pub fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: f64) -> Cell {
    let text = format!("{change:.1}%");
    if change >= 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    }
}

pub fn status_cell(status: HealthStatus) -> Cell {
    let color = match status {
        HealthStatus::Excellent => Color::Green,
        HealthStatus::Good => Color::DarkGreen,
        HealthStatus::Warning => Color::Yellow,
        HealthStatus::Critical => Color::Red,
    };
    Cell::new(status.to_string().to_uppercase())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

pub fn trend_text(trend: Trend) -> String {
    match trend {
        Trend::Up => style("▲ up").green().to_string(),
        Trend::Down => style("▼ down").red().to_string(),
        Trend::Stable => style("● stable").dim().to_string(),
    }
}

/// Creates a cell for missing values.
pub fn na_cell() -> Cell {
    Cell::new("N/A").fg(Color::DarkGrey)
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
