//! Expense service
//!
//! Provides business logic for managing expenses, including category
//! resolution and the payment account fallback.

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{ExpenseRecord, Frequency, Money, SplitMode};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Input for a new expense
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// Category picked from the known list
    pub category: Option<String>,
    /// Free-text category; wins over `category` when non-empty
    pub custom_category: Option<String>,
    pub person_or_account: String,
    /// Defaults to `person_or_account`
    pub paid_from_account: Option<String>,
    pub description: String,
    pub is_shared: bool,
    pub frequency: Frequency,
    pub split_mode: SplitMode,
    pub amount: Money,
}

/// Fields to change on an existing expense; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub category: Option<String>,
    pub custom_category: Option<String>,
    pub person_or_account: Option<String>,
    pub paid_from_account: Option<String>,
    pub description: Option<String>,
    pub is_shared: Option<bool>,
    pub frequency: Option<Frequency>,
    pub split_mode: Option<SplitMode>,
    pub amount: Option<Money>,
}

impl ExpenseUpdate {
    /// Check if any field would change
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.custom_category.is_none()
            && self.person_or_account.is_none()
            && self.paid_from_account.is_none()
            && self.description.is_none()
            && self.is_shared.is_none()
            && self.frequency.is_none()
            && self.split_mode.is_none()
            && self.amount.is_none()
    }
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Pick the category to store
    ///
    /// A non-empty custom category wins over the selected one; if both are
    /// empty the configured uncategorized label is used.
    pub fn resolve_category(&self, selected: Option<&str>, custom: Option<&str>) -> String {
        let custom = custom.map(str::trim).unwrap_or_default();
        if !custom.is_empty() {
            return custom.to_string();
        }
        let selected = selected.map(str::trim).unwrap_or_default();
        if !selected.is_empty() {
            return selected.to_string();
        }
        self.settings.uncategorized_label.clone()
    }

    /// Record a new expense and append it to the file
    pub fn add(&self, input: NewExpense) -> BudgetResult<(usize, ExpenseRecord)> {
        let category =
            self.resolve_category(input.category.as_deref(), input.custom_category.as_deref());
        let person_or_account = input.person_or_account.trim().to_string();
        let paid_from_account = match input.paid_from_account.as_deref().map(str::trim) {
            Some(account) if !account.is_empty() => account.to_string(),
            _ => person_or_account.clone(),
        };

        let expense = ExpenseRecord {
            category,
            person_or_account,
            paid_from_account,
            description: input.description.trim().to_string(),
            is_shared: input.is_shared,
            frequency: input.frequency,
            split_mode: input.split_mode,
            amount: input.amount,
        };

        expense
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.warn_unknown_account(&expense)?;

        let index = self.storage.expenses.append(expense.clone())?;
        tracing::info!(
            category = %expense.category,
            amount = %expense.amount,
            shared = expense.is_shared,
            "added expense"
        );

        Ok((index, expense))
    }

    /// Get the expense at a position
    pub fn get(&self, index: usize) -> BudgetResult<ExpenseRecord> {
        self.storage
            .expenses
            .get(index)?
            .ok_or_else(|| BudgetError::expense_not_found(index))
    }

    /// Get all expenses in file order
    pub fn list(&self) -> BudgetResult<Vec<ExpenseRecord>> {
        self.storage.expenses.get_all()
    }

    /// Change an expense and rewrite the file
    ///
    /// When the payer changes and the payment account was only the implicit
    /// fallback, the payment account follows the new payer.
    pub fn update(&self, index: usize, update: ExpenseUpdate) -> BudgetResult<ExpenseRecord> {
        let mut expense = self.get(index)?;

        if update.category.is_some() || update.custom_category.is_some() {
            expense.category = self.resolve_category(
                update.category.as_deref(),
                update.custom_category.as_deref(),
            );
        }
        if let Some(person_or_account) = update.person_or_account {
            let follows_payer = expense.paid_from_account == expense.person_or_account;
            expense.person_or_account = person_or_account.trim().to_string();
            if follows_payer {
                expense.paid_from_account = expense.person_or_account.clone();
            }
        }
        if let Some(account) = update.paid_from_account {
            let account = account.trim();
            expense.paid_from_account = if account.is_empty() {
                expense.person_or_account.clone()
            } else {
                account.to_string()
            };
        }
        if let Some(description) = update.description {
            expense.description = description.trim().to_string();
        }
        if let Some(is_shared) = update.is_shared {
            expense.is_shared = is_shared;
        }
        if let Some(frequency) = update.frequency {
            expense.frequency = frequency;
        }
        if let Some(split_mode) = update.split_mode {
            expense.split_mode = split_mode;
        }
        if let Some(amount) = update.amount {
            expense.amount = amount;
        }

        expense
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.warn_unknown_account(&expense)?;

        self.storage.expenses.update(index, expense.clone())?;
        self.storage.expenses.save()?;
        tracing::info!(index, category = %expense.category, "updated expense");

        Ok(expense)
    }

    /// Remove an expense and rewrite the file
    pub fn delete(&self, index: usize) -> BudgetResult<ExpenseRecord> {
        let removed = self.storage.expenses.remove(index)?;
        self.storage.expenses.save()?;
        tracing::info!(index, category = %removed.category, "removed expense");
        Ok(removed)
    }

    /// Categories to choose from: the configured ones, then any others in use
    pub fn categories(&self) -> BudgetResult<Vec<String>> {
        let mut categories: Vec<String> = Vec::new();

        let configured = self.settings.base_categories.iter().map(String::as_str);
        let in_use = self.storage.expenses.get_all()?;

        for category in configured.chain(in_use.iter().map(|e| e.category.as_str())) {
            let category = category.trim();
            if !category.is_empty() && !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }

        Ok(categories)
    }

    fn warn_unknown_account(&self, expense: &ExpenseRecord) -> BudgetResult<()> {
        let account = expense.payment_account();
        if !self.storage.accounts.name_exists(account)? {
            tracing::warn!(account, "expense is paid from an account that is not registered");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn miete() -> NewExpense {
        NewExpense {
            category: Some("Hypothek / Miete".into()),
            person_or_account: "Gemeinschaftskonto".into(),
            is_shared: true,
            amount: Money::new(900.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_resolution() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        assert_eq!(
            service.resolve_category(Some("Strom"), Some(" Urlaub ")),
            "Urlaub"
        );
        assert_eq!(service.resolve_category(Some("Strom"), Some("  ")), "Strom");
        assert_eq!(service.resolve_category(None, None), "Unkategorisiert");
        assert_eq!(service.resolve_category(Some(""), None), "Unkategorisiert");
    }

    #[test]
    fn test_add_fills_payment_account() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let (index, expense) = service.add(miete()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(expense.paid_from_account, "Gemeinschaftskonto");
        assert_eq!(expense.split_mode, SplitMode::Income);

        let (_, expense) = service
            .add(NewExpense {
                paid_from_account: Some("Konto Andreas".into()),
                ..miete()
            })
            .unwrap();
        assert_eq!(expense.paid_from_account, "Konto Andreas");
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_add_rejects_negative_amount() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let err = service
            .add(NewExpense {
                amount: Money::new(-1.0),
                ..miete()
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service.add(miete()).unwrap();

        let updated = service
            .update(
                0,
                ExpenseUpdate {
                    person_or_account: Some("Andreas".into()),
                    frequency: Some(Frequency::Quarterly),
                    split_mode: Some(SplitMode::Equal),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.category, "Hypothek / Miete");
        assert_eq!(updated.paid_from_account, "Andreas");
        assert_eq!(updated.monthly_amount(), Money::new(300.0));

        storage.expenses.load().unwrap();
        let reloaded = service.get(0).unwrap();
        assert_eq!(reloaded.frequency, Frequency::Quarterly);
        assert_eq!(reloaded.split_mode, SplitMode::Equal);
    }

    #[test]
    fn test_update_keeps_explicit_payment_account() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service
            .add(NewExpense {
                paid_from_account: Some("Konto Katharina".into()),
                ..miete()
            })
            .unwrap();

        let updated = service
            .update(
                0,
                ExpenseUpdate {
                    person_or_account: Some("Katharina".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.paid_from_account, "Konto Katharina");
    }

    #[test]
    fn test_delete_and_missing_positions() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service.add(miete()).unwrap();

        assert!(service.delete(1).unwrap_err().is_not_found());
        assert_eq!(service.delete(0).unwrap().amount, Money::new(900.0));
        assert!(service.get(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_and_remove_keep_unknown_columns() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let path = storage.paths().expenses_file();
        let contents = "category,person_or_account,paid_from_account,description,is_shared,frequency,split_mode,amount,notiz\n\
                        Miete,A,A,,ja,monthly,income,900,Staffelmiete\n";
        std::fs::write(&path, contents).unwrap();
        storage.expenses.load().unwrap();

        let update = ExpenseUpdate {
            amount: Some(Money::new(950.0)),
            ..Default::default()
        };
        assert!(matches!(service.update(0, update), Err(BudgetError::Schema(_))));
        assert!(matches!(service.delete(0), Err(BudgetError::Schema(_))));
        assert!(matches!(service.add(miete()), Err(BudgetError::Schema(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_categories() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service
            .add(NewExpense {
                custom_category: Some("Urlaub".into()),
                ..miete()
            })
            .unwrap();
        service.add(miete()).unwrap();

        let categories = service.categories().unwrap();
        assert_eq!(categories.len(), settings.base_categories.len() + 1);
        assert_eq!(categories[0], settings.base_categories[0]);
        assert_eq!(categories.last().unwrap(), "Urlaub");
    }
}
