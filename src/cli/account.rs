//! Account CLI commands
//!
//! Implements CLI commands for the account registry.

use clap::Subcommand;

use crate::display::account::format_account_list;
use crate::error::BudgetResult;
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register an account
    Add {
        /// Account name
        name: String,
        /// Account holder; leave out for joint accounts
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// List all accounts
    List,
    /// Remove an account from the registry
    #[command(alias = "rm")]
    Remove {
        /// Account name
        name: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> BudgetResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Add { name, owner } => {
            let account = service.add(&name, owner.as_deref())?;
            println!("Added account: {}", account.name);
            if !account.owner.is_empty() {
                println!("  Owner: {}", account.owner);
            }
        }

        AccountCommands::List => {
            print!("{}", format_account_list(&service.list()?));
        }

        AccountCommands::Remove { name } => {
            let removed = service.delete(&name)?;
            println!("Removed account: {}", removed.name);
        }
    }

    Ok(())
}
