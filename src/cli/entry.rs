use super::ui;
use crate::core::coerce::coerce_number;
use crate::core::registry::{BusinessId, ExtraField};
use crate::core::{Dashboard, Entry, EntryUpdate};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::Cell;

/// Raw field values as typed by the user. Numbers are coerced, never rejected.
#[derive(Debug, Clone, Default)]
pub struct EntryInput {
    pub date: Option<String>,
    pub revenue: Option<String>,
    pub salaries: Option<String>,
    pub expenses: Option<String>,
    pub clients: Option<String>,
    pub hours: Option<String>,
    pub investor: Option<String>,
    pub items: Option<String>,
    pub video: Option<String>,
    pub promotion: Option<String>,
    pub transactions: Option<String>,
    pub notes: Option<String>,
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{input}', expected YYYY-MM-DD"))
}

impl EntryInput {
    pub fn to_update(&self) -> Result<EntryUpdate> {
        let number = |raw: &Option<String>| raw.as_deref().map(coerce_number);
        Ok(EntryUpdate {
            date: self.date.as_deref().map(parse_date).transpose()?,
            revenue: number(&self.revenue),
            salaries: number(&self.salaries),
            expenses: number(&self.expenses),
            clients: number(&self.clients),
            hours: number(&self.hours),
            investor: number(&self.investor),
            items: self.items.clone(),
            video: number(&self.video),
            promotion: number(&self.promotion),
            transactions: number(&self.transactions),
            notes: self.notes.clone(),
        })
    }

    /// Builds a complete entry for `business`. A date is required.
    pub fn to_entry(&self, business: BusinessId) -> Result<Entry> {
        let update = self.to_update()?;
        let date = update
            .date
            .ok_or_else(|| anyhow!("A date is required when adding an entry"))?;
        let mut entry = Entry::new(business, date);
        entry.apply(&update);
        Ok(entry)
    }
}

pub fn render_entry(entry: &Entry) -> String {
    let business = entry.business();
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

    table.add_row(vec![Cell::new("date"), Cell::new(entry.date().to_string())]);
    table.add_row(vec![Cell::new("revenue"), ui::number_cell(entry.revenue())]);
    table.add_row(vec![Cell::new("salaries"), ui::number_cell(entry.salaries())]);
    table.add_row(vec![Cell::new("expenses"), ui::number_cell(entry.expenses())]);
    table.add_row(vec![Cell::new("net profit"), ui::money_cell(entry.net_profit())]);

    for field in business.extra_fields() {
        let value = match field {
            ExtraField::Items => entry.details().items().map(Cell::new),
            numeric => entry.details().number(*numeric).map(ui::number_cell),
        };
        table.add_row(vec![Cell::new(field.name()), value.unwrap_or_else(ui::na_cell)]);
    }
    table.add_row(vec![Cell::new("notes"), Cell::new(entry.notes())]);

    format!(
        "{}\n\n{}",
        ui::style_text(business.business().name, ui::StyleType::Title),
        table
    )
}

pub fn show(dashboard: &Dashboard, business: BusinessId) {
    println!("{}", render_entry(&dashboard.get_current_entry(business)));
}

pub fn update(dashboard: &mut Dashboard, business: BusinessId, input: &EntryInput) -> Result<()> {
    let update = input.to_update()?;
    if update.is_empty() {
        println!(
            "{}",
            ui::style_text("Nothing to update.", ui::StyleType::Subtle)
        );
        return Ok(());
    }
    dashboard.update_current_entry(business, &update)?;
    show(dashboard, business);
    Ok(())
}

pub fn add(dashboard: &mut Dashboard, business: BusinessId, input: &EntryInput) -> Result<()> {
    let entry = input.to_entry(business)?;
    dashboard.add_business_entry(business, entry)?;
    show(dashboard, business);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_update_coerces_numbers() {
        let input = EntryInput {
            revenue: Some("1200".to_string()),
            salaries: Some("abc".to_string()),
            hours: Some(" 7.5 ".to_string()),
            items: Some("pallets".to_string()),
            ..Default::default()
        };

        let update = input.to_update().unwrap();
        assert_eq!(update.revenue, Some(1200.0));
        assert_eq!(update.salaries, Some(0.0));
        assert_eq!(update.expenses, None);
        assert_eq!(update.hours, Some(7.5));
        assert_eq!(update.items.as_deref(), Some("pallets"));
        assert_eq!(update.date, None);
    }

    #[test]
    fn test_to_update_rejects_bad_date() {
        let input = EntryInput {
            date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        let err = input.to_update().unwrap_err();
        assert!(err.to_string().contains("Invalid date '01/02/2024'"));
    }

    #[test]
    fn test_to_entry_requires_date() {
        assert!(EntryInput::default().to_entry(BusinessId::Apl).is_err());

        let input = EntryInput {
            date: Some("2024-02-29".to_string()),
            revenue: Some("10".to_string()),
            expenses: Some("4".to_string()),
            ..Default::default()
        };
        let entry = input.to_entry(BusinessId::Apl).unwrap();
        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(entry.net_profit(), 6.0);
    }

    #[test]
    fn test_render_entry_lists_schema_fields() {
        let mut entry = Entry::new(BusinessId::Apl, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        entry.apply(&EntryUpdate {
            items: Some("pallets".to_string()),
            ..Default::default()
        });

        let output = render_entry(&entry);
        assert!(output.contains("Angry Panda Logistics"));
        assert!(output.contains("pallets"));
        assert!(output.contains("investor"));
        assert!(!output.contains("clients"));
    }
}
