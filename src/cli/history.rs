use super::{show, ui};
use crate::core::Portfolio;
use crate::core::analytics::overall_health;
use comfy_table::{Cell, CellAlignment};

pub fn render_history(history: &[Portfolio], currency: &str) -> String {
    let title = ui::style_text("Saved Snapshots", ui::StyleType::Title);
    if history.is_empty() {
        return format!(
            "{title}\n\n{}",
            ui::style_text(
                "No snapshots yet. Run `polymath save` to record one.",
                ui::StyleType::Subtle
            )
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Entries"),
        ui::header_cell(&format!("Revenue ({currency})")),
        ui::header_cell(&format!("Net Profit ({currency})")),
        ui::header_cell("Health"),
    ]);

    // Newest first.
    for (i, snapshot) in history.iter().enumerate().rev() {
        let health = overall_health(snapshot);
        let entries: usize = snapshot.iter().map(|l| l.entries().len()).sum();
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(entries).set_alignment(CellAlignment::Right),
            ui::number_cell(health.total_revenue),
            ui::money_cell(health.total_net_profit),
            Cell::new(format!(
                "{:.0}/100 {}",
                health.health_score,
                show::health_label(health.health_score)
            )),
        ]);
    }

    format!("{title}\n\n{table}")
}

pub fn run(history: &[Portfolio], currency: &str) {
    println!("{}", render_history(history, currency));
}
