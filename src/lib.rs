pub mod cli;
pub mod core;
pub mod store;

use crate::cli::entry::EntryInput;
use crate::core::config::AppConfig;
use crate::core::{BusinessId, Clock, Dashboard, SystemClock};
use anyhow::Result;
use tracing::debug;

pub enum AppCommand {
    Show { series: Option<usize> },
    Entry { business: String },
    Update { business: String, input: EntryInput },
    Add { business: String, input: EntryInput },
    Save,
    History,
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    run_with_clock(command, &config, Box::new(SystemClock))
}

pub fn run_with_clock(command: AppCommand, config: &AppConfig, clock: Box<dyn Clock>) -> Result<()> {
    let opened = store::open(config);
    let mut dashboard = Dashboard::load(opened.store, clock).with_storage_warning(opened.warning);
    let currency = config.currency.as_str();

    let result = match command {
        AppCommand::Show { series } => {
            cli::show::run(&dashboard, currency, series);
            Ok(())
        }
        AppCommand::Entry { business } => {
            cli::entry::show(&dashboard, business.parse::<BusinessId>()?);
            Ok(())
        }
        AppCommand::Update { business, input } => {
            cli::entry::update(&mut dashboard, business.parse()?, &input)
        }
        AppCommand::Add { business, input } => {
            cli::entry::add(&mut dashboard, business.parse()?, &input)
        }
        AppCommand::Save => dashboard.save_data().map(|()| {
            println!(
                "Saved snapshot {} of {}",
                dashboard.history().len(),
                crate::core::persistence::HISTORY_CAPACITY
            );
        }),
        AppCommand::History => {
            cli::history::run(dashboard.history(), currency);
            Ok(())
        }
    };

    if let Some(warning) = dashboard.storage_warning() {
        eprintln!(
            "{}",
            cli::ui::style_text(&format!("Warning: {warning}"), cli::ui::StyleType::Error)
        );
    }
    result
}
