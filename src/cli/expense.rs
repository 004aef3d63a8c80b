//! Expense CLI commands
//!
//! Implements CLI commands for managing expenses.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::expense::{format_category_list, format_expense_list};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{ExpenseRecord, Frequency, SplitMode};
use crate::services::{ExpenseService, ExpenseUpdate, NewExpense};
use crate::storage::Storage;

use super::{parse_amount, position};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount per billing period (e.g., "900" or "89,90")
        amount: String,
        /// Category from 'expense categories'
        #[arg(short, long)]
        category: Option<String>,
        /// Any other category; wins over --category
        #[arg(long)]
        custom_category: Option<String>,
        /// Who pays, or the account that is debited
        #[arg(short, long, default_value = "")]
        person: String,
        /// Account the money leaves from (defaults to --person)
        #[arg(long)]
        paid_from: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Split the expense between both partners
        #[arg(short, long)]
        shared: bool,
        /// Billing period (monthly, quarterly, yearly)
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// How a shared expense is split (income, equal)
        #[arg(long, default_value = "income")]
        split: String,
    },

    /// List all expenses
    List,

    /// Edit an expense
    Edit {
        /// Number shown by 'expense list'
        number: usize,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        custom_category: Option<String>,
        #[arg(short, long)]
        person: Option<String>,
        /// Account the money leaves from; empty resets it to --person
        #[arg(long)]
        paid_from: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Mark the expense as shared
        #[arg(long, conflicts_with = "private")]
        shared: bool,
        /// Mark the expense as private
        #[arg(long)]
        private: bool,
        #[arg(short, long)]
        frequency: Option<String>,
        #[arg(long)]
        split: Option<String>,
    },

    /// Remove an expense
    #[command(alias = "rm")]
    Remove {
        /// Number shown by 'expense list'
        number: usize,
    },

    /// List the known categories
    Categories,
}

fn parse_frequency(value: &str) -> BudgetResult<Frequency> {
    Frequency::parse(value).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid frequency: '{}'. Valid values: monthly, quarterly, yearly",
            value
        ))
    })
}

fn parse_split_mode(value: &str) -> BudgetResult<SplitMode> {
    SplitMode::parse(value).ok_or_else(|| {
        BudgetError::Validation(format!(
            "Invalid split mode: '{}'. Valid values: income, equal",
            value
        ))
    })
}

fn describe(expense: &ExpenseRecord, settings: &Settings) -> String {
    let mut text = format!(
        "{} {} {}",
        expense.category,
        expense.amount.format_with_symbol(&settings.currency_symbol),
        expense.frequency
    );
    if expense.is_shared {
        text.push_str(&format!(", shared by {}", expense.split_mode));
    }
    text
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> BudgetResult<()> {
    let service = ExpenseService::new(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            custom_category,
            person,
            paid_from,
            description,
            shared,
            frequency,
            split,
        } => {
            let input = NewExpense {
                category,
                custom_category,
                person_or_account: person,
                paid_from_account: paid_from,
                description,
                is_shared: shared,
                frequency: parse_frequency(&frequency)?,
                split_mode: parse_split_mode(&split)?,
                amount: parse_amount(&amount)?,
            };

            let (index, expense) = service.add(input)?;
            println!("Added expense #{}: {}", index + 1, describe(&expense, settings));
        }

        ExpenseCommands::List => {
            let expenses = service.list()?;
            print!("{}", format_expense_list(&expenses, &settings.currency_symbol));
        }

        ExpenseCommands::Edit {
            number,
            amount,
            category,
            custom_category,
            person,
            paid_from,
            description,
            shared,
            private,
            frequency,
            split,
        } => {
            let index = position(number)?;
            let update = ExpenseUpdate {
                category,
                custom_category,
                person_or_account: person,
                paid_from_account: paid_from,
                description,
                is_shared: match (shared, private) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                frequency: frequency.as_deref().map(parse_frequency).transpose()?,
                split_mode: split.as_deref().map(parse_split_mode).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
            };

            if update.is_empty() {
                println!("No changes specified. Run 'household expense edit --help' for options.");
                return Ok(());
            }

            let expense = service.update(index, update)?;
            println!("Updated expense #{}: {}", number, describe(&expense, settings));
        }

        ExpenseCommands::Remove { number } => {
            let removed = service.delete(position(number)?)?;
            println!("Removed expense #{}: {}", number, describe(&removed, settings));
        }

        ExpenseCommands::Categories => {
            print!("{}", format_category_list(&service.categories()?));
        }
    }

    Ok(())
}
