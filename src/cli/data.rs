//! Data file maintenance commands

use crate::error::BudgetResult;
use crate::display::report::format_skipped_rows;
use crate::storage::{MigrationOutcome, Storage};

/// Bring all data files to the current layout
pub fn handle_migrate(storage: &Storage) -> BudgetResult<()> {
    for (table, outcome) in storage.migrate()? {
        match outcome {
            MigrationOutcome::UpToDate => println!("{}: up to date", table),
            MigrationOutcome::NotPresent => {
                println!("{}: no file yet (run 'household init')", table)
            }
            MigrationOutcome::Migrated { from_version, rows } => println!(
                "{}: migrated {} row(s) from version {}",
                table, rows, from_version
            ),
        }
    }
    Ok(())
}

/// List the rows that could not be read
pub fn handle_check(storage: &Storage) -> BudgetResult<bool> {
    let skipped = storage.skipped_rows()?;
    print!("{}", format_skipped_rows(&skipped));
    Ok(skipped.is_empty())
}
