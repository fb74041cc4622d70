use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use polymath::cli::entry::EntryInput;
use polymath::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Entry fields. Numbers that fail to parse are recorded as zero.
#[derive(Args)]
struct EntryFields {
    /// Entry date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    revenue: Option<String>,
    #[arg(long)]
    salaries: Option<String>,
    #[arg(long)]
    expenses: Option<String>,
    #[arg(long)]
    clients: Option<String>,
    #[arg(long)]
    hours: Option<String>,
    #[arg(long)]
    investor: Option<String>,
    #[arg(long)]
    items: Option<String>,
    #[arg(long)]
    video: Option<String>,
    #[arg(long)]
    promotion: Option<String>,
    #[arg(long)]
    transactions: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<EntryFields> for EntryInput {
    fn from(fields: EntryFields) -> EntryInput {
        EntryInput {
            date: fields.date,
            revenue: fields.revenue,
            salaries: fields.salaries,
            expenses: fields.expenses,
            clients: fields.clients,
            hours: fields.hours,
            investor: fields.investor,
            items: fields.items,
            video: fields.video,
            promotion: fields.promotion,
            transactions: fields.transactions,
            notes: fields.notes,
        }
    }
}

impl From<Commands> for polymath::AppCommand {
    fn from(cmd: Commands) -> polymath::AppCommand {
        match cmd {
            Commands::Show { series } => polymath::AppCommand::Show { series },
            Commands::Entry { business } => polymath::AppCommand::Entry { business },
            Commands::Update { business, fields } => polymath::AppCommand::Update {
                business,
                input: fields.into(),
            },
            Commands::Add { business, fields } => polymath::AppCommand::Add {
                business,
                input: fields.into(),
            },
            Commands::Save => polymath::AppCommand::Save,
            Commands::History => polymath::AppCommand::History,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display portfolio health and per-business metrics
    Show {
        /// Also list the most recent merged daily totals (default 7)
        #[arg(long, value_name = "COUNT", num_args = 0..=1, default_missing_value = "7")]
        series: Option<usize>,
    },
    /// Display the current entry of a business
    Entry {
        /// Business id: iclean, icandy, apl, apmg or instafund
        business: String,
    },
    /// Update today's entry of a business, creating it if needed
    Update {
        /// Business id: iclean, icandy, apl, apmg or instafund
        business: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Append a dated entry to a business
    Add {
        /// Business id: iclean, icandy, apl, apmg or instafund
        business: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Save a snapshot of the whole portfolio
    Save,
    /// List saved snapshots
    History,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => polymath::cli::setup::setup(),
        Some(cmd) => polymath::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
