//! Income CLI commands
//!
//! Implements CLI commands for managing incomes.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::income::format_income_list;
use crate::error::BudgetResult;
use crate::services::{IncomeService, IncomeUpdate};
use crate::storage::Storage;

use super::{parse_amount, position};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record a monthly income
    Add {
        /// Who receives the income (a partner or e.g. "Kindergeld")
        person: String,
        /// Monthly amount (e.g., "3000" or "2.750,50")
        amount: String,
        /// Where the money comes from
        #[arg(short, long, default_value = "")]
        source: String,
        /// Account the income is paid into
        #[arg(short, long)]
        account: Option<String>,
    },

    /// List all incomes
    List,

    /// Edit an income
    Edit {
        /// Number shown by 'income list'
        number: usize,
        #[arg(short, long)]
        person: Option<String>,
        #[arg(short, long)]
        source: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Remove an income
    #[command(alias = "rm")]
    Remove {
        /// Number shown by 'income list'
        number: usize,
    },
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> BudgetResult<()> {
    let service = IncomeService::new(storage);

    match cmd {
        IncomeCommands::Add {
            person,
            amount,
            source,
            account,
        } => {
            let amount = parse_amount(&amount)?;
            let (index, income) = service.add(&person, &source, amount, account.as_deref())?;

            println!(
                "Added income #{}: {} {}",
                index + 1,
                income.person,
                income.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        IncomeCommands::List => {
            let incomes = service.list()?;
            print!("{}", format_income_list(&incomes, &settings.currency_symbol));
        }

        IncomeCommands::Edit {
            number,
            person,
            source,
            amount,
            account,
        } => {
            let index = position(number)?;
            let update = IncomeUpdate {
                person,
                source,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                account,
            };

            if update.is_empty() {
                println!("No changes specified. Use --person, --source, --amount or --account.");
                return Ok(());
            }

            let income = service.update(index, update)?;
            println!(
                "Updated income #{}: {} {}",
                number,
                income.person,
                income.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        IncomeCommands::Remove { number } => {
            let removed = service.delete(position(number)?)?;
            println!(
                "Removed income #{}: {} {}",
                number,
                removed.person,
                removed.amount.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}
