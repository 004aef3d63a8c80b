use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use household_budget::cli::{
    handle_account_command, handle_check, handle_dashboard, handle_expense_command,
    handle_income_command, handle_migrate, handle_transfers,
};
use household_budget::config::{paths::BudgetPaths, settings::Settings};
use household_budget::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "household",
    version,
    about = "Household budget tracker for two partners",
    long_about = "Tracks incomes and recurring expenses of a household and works out \
                  how much each partner transfers to which account every month to \
                  cover the shared costs."
)]
struct Cli {
    /// Directory holding settings and data files
    #[arg(long, global = true, env = "HOUSEHOLD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income management commands
    #[command(subcommand)]
    Income(household_budget::cli::IncomeCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(household_budget::cli::ExpenseCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(household_budget::cli::AccountCommands),

    /// Show totals, the shared-cost split and the transfer overview
    Dashboard {
        /// Print the computed values as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how much each partner transfers to which account
    Transfers {
        /// Print the transfer overview as JSON
        #[arg(long)]
        json: bool,
        /// Export the transfer overview to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize data files and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Convert data files written by older versions
    Migrate,

    /// List rows that could not be read
    Check,
}

fn init_logging(verbose: u8, settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => settings.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!(
            "household_budget={level},household={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => BudgetPaths::with_base_dir(dir),
        None => BudgetPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    init_logging(cli.verbose, &settings);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Income(cmd)) => handle_income_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Account(cmd)) => handle_account_command(&storage, cmd)?,
        Some(Commands::Dashboard { json }) => handle_dashboard(&storage, &settings, json)?,
        Some(Commands::Transfers { json, output }) => {
            handle_transfers(&storage, &settings, json, output)?
        }
        Some(Commands::Init) => {
            println!("Initializing household budget at: {}", paths.base_dir().display());
            let summary = initialize_storage(&paths, &settings)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
                println!("Created settings: {}", paths.settings_file().display());
            }
            for table in &summary.created {
                println!("Created {}.csv", table);
            }
            for (table, version) in &summary.migrated {
                println!("Migrated {}.csv from version {}", table, version);
            }
            println!("Initialization complete!");
            println!();
            println!(
                "Partners: {} and {}",
                settings.household.partner_a, settings.household.partner_b
            );
            println!("Edit {} to change them.", paths.settings_file().display());
        }
        Some(Commands::Config) => {
            println!("Household Budget Configuration");
            println!("==============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Partner A:        {}", settings.household.partner_a);
            println!("  Partner B:        {}", settings.household.partner_b);
            println!(
                "  Offset incomes:   {}",
                settings.household.offset_incomes.join(", ")
            );
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Log level:        {}", settings.log_level);
        }
        Some(Commands::Migrate) => handle_migrate(&storage)?,
        Some(Commands::Check) => {
            if !handle_check(&storage)? {
                return Ok(ExitCode::from(2));
            }
        }
        None => {
            println!("household - Household budget for two partners");
            println!();
            println!("Run 'household --help' for usage information.");
            println!("Run 'household init' to get started.");
        }
    }

    Ok(ExitCode::SUCCESS)
}
