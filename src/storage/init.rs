//! Storage initialization
//!
//! Handles first-run setup: data files with headers, default accounts and
//! migration of files written by older versions.

use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetError;
use crate::models::Account;

use super::csv_io::write_csv_atomic;
use super::schema::{ensure_table, migrate_table, MigrationOutcome, ACCOUNTS, EXPENSES, INCOMES};

/// What `initialize_storage` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitSummary {
    /// Files that were created
    pub created: Vec<&'static str>,
    /// Tables that were migrated, with their old version
    pub migrated: Vec<(&'static str, u32)>,
}

/// Initialize storage for a fresh or older installation
pub fn initialize_storage(
    paths: &BudgetPaths,
    settings: &Settings,
) -> Result<InitSummary, BudgetError> {
    paths.ensure_directories()?;

    let mut summary = InitSummary::default();

    if !paths.accounts_file().exists() {
        create_default_accounts(paths, settings)?;
        summary.created.push(ACCOUNTS.table);
    }

    for (path, schema) in [
        (paths.incomes_file(), &INCOMES),
        (paths.expenses_file(), &EXPENSES),
        (paths.accounts_file(), &ACCOUNTS),
    ] {
        if ensure_table(&path, schema)? {
            summary.created.push(schema.table);
            continue;
        }
        if let MigrationOutcome::Migrated { from_version, .. } = migrate_table(&path, schema)? {
            summary.migrated.push((schema.table, from_version));
        }
    }

    Ok(summary)
}

/// Write the configured default accounts
fn create_default_accounts(paths: &BudgetPaths, settings: &Settings) -> Result<(), BudgetError> {
    let partners = [
        settings.household.partner_a.as_str(),
        settings.household.partner_b.as_str(),
    ];

    let rows = settings
        .default_accounts
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| {
            // "Konto Andreas" belongs to Andreas
            let owner = partners
                .iter()
                .find(|p| !p.trim().is_empty() && name.contains(p.trim()))
                .map(|p| p.trim().to_string())
                .unwrap_or_default();
            let account = Account::new(name).with_owner(owner);
            vec![account.name, account.owner]
        });

    write_csv_atomic(paths.accounts_file(), &ACCOUNTS.headers(), rows)?;
    tracing::info!(
        count = settings.default_accounts.len(),
        "created default accounts"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fresh_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let summary = initialize_storage(&paths, &Settings::default()).unwrap();

        assert!(paths.incomes_file().exists());
        assert!(paths.expenses_file().exists());
        assert!(summary.created.contains(&"incomes"));
        assert!(summary.created.contains(&"expenses"));
        assert!(summary.created.contains(&"accounts"));
        assert!(summary.migrated.is_empty());

        let accounts = fs::read_to_string(paths.accounts_file()).unwrap();
        assert!(accounts.contains("Gemeinschaftskonto,\n"));
        assert!(accounts.contains("Konto Andreas,Andreas\n"));
        assert!(accounts.contains("Konto Katharina,Katharina\n"));

        let incomes = fs::read_to_string(paths.incomes_file()).unwrap();
        assert_eq!(incomes, "person,source,amount,account\n");
    }

    #[test]
    fn test_initialization_migrates_legacy_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        fs::write(paths.incomes_file(), "person,source,amount\nAndreas,Gehalt,3000\n").unwrap();

        let summary = initialize_storage(&paths, &Settings::default()).unwrap();

        assert_eq!(summary.migrated, vec![("incomes", 1)]);
        let incomes = fs::read_to_string(paths.incomes_file()).unwrap();
        assert_eq!(incomes, "person,source,amount,account\nAndreas,Gehalt,3000,\n");
    }

    #[test]
    fn test_initialization_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths, &Settings::default()).unwrap();
        let summary = initialize_storage(&paths, &Settings::default()).unwrap();

        assert_eq!(summary, InitSummary::default());
    }
}
