//! User settings for the household budget
//!
//! Names the two partners, the income streams that offset shared costs, the
//! default accounts and categories, and display preferences.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::reports::allocation::AllocationConfig;

/// The two partners who split shared costs and the offsetting income streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdSettings {
    /// First partner, matched against `IncomeRecord::person`
    #[serde(default = "default_partner_a")]
    pub partner_a: String,

    /// Second partner, matched against `IncomeRecord::person`
    #[serde(default = "default_partner_b")]
    pub partner_b: String,

    /// Income persons whose income reduces shared costs before splitting
    #[serde(default = "default_offset_incomes")]
    pub offset_incomes: Vec<String>,
}

impl Default for HouseholdSettings {
    fn default() -> Self {
        Self {
            partner_a: default_partner_a(),
            partner_b: default_partner_b(),
            offset_incomes: default_offset_incomes(),
        }
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub household: HouseholdSettings,

    /// Currency symbol appended to amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Accounts created on initialization
    #[serde(default = "default_accounts")]
    pub default_accounts: Vec<String>,

    /// Categories offered before any expense exists
    #[serde(default = "default_base_categories")]
    pub base_categories: Vec<String>,

    /// Category used when an expense is entered without one
    #[serde(default = "default_uncategorized")]
    pub uncategorized_label: String,

    /// Log filter used when neither RUST_LOG nor -v is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_partner_a() -> String {
    "Andreas".to_string()
}

fn default_partner_b() -> String {
    "Katharina".to_string()
}

fn default_offset_incomes() -> Vec<String> {
    vec!["Kindergeld".to_string()]
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_accounts() -> Vec<String> {
    vec![
        "Gemeinschaftskonto".to_string(),
        "Konto Andreas".to_string(),
        "Konto Katharina".to_string(),
    ]
}

fn default_base_categories() -> Vec<String> {
    [
        "Hypothek / Miete",
        "Strom",
        "Auto",
        "Versicherung",
        "Persönliche Versicherung",
        "Persönliches Handy",
        "Kinderbetreuung",
        "Lebensmittel",
        "Sonstige feste Kosten",
        "Sonstige variable Kosten",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_uncategorized() -> String {
    "Unkategorisiert".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            household: HouseholdSettings::default(),
            currency_symbol: default_currency(),
            default_accounts: default_accounts(),
            base_categories: default_base_categories(),
            uncategorized_label: default_uncategorized(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject household definitions the allocation cannot work with
    pub fn validate(&self) -> Result<(), BudgetError> {
        let a = self.household.partner_a.trim();
        let b = self.household.partner_b.trim();

        if a.is_empty() || b.is_empty() {
            return Err(BudgetError::Config("Partner names cannot be empty".into()));
        }
        if a == b {
            return Err(BudgetError::Config(format!(
                "Both partners are named '{}'",
                a
            )));
        }
        if let Some(offset) = self
            .household
            .offset_incomes
            .iter()
            .find(|o| o.trim() == a || o.trim() == b)
        {
            return Err(BudgetError::Config(format!(
                "'{}' cannot be both a partner and an offset income",
                offset.trim()
            )));
        }
        Ok(())
    }

    /// Matching keys for the allocation engine
    pub fn allocation_config(&self) -> AllocationConfig {
        AllocationConfig {
            partner_a: self.household.partner_a.trim().to_string(),
            partner_b: self.household.partner_b.trim().to_string(),
            offset_incomes: self
                .household
                .offset_incomes
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.household.partner_a, "Andreas");
        assert_eq!(settings.household.partner_b, "Katharina");
        assert_eq!(settings.household.offset_incomes, vec!["Kindergeld"]);
        assert_eq!(settings.base_categories.len(), 10);
        assert_eq!(settings.uncategorized_label, "Unkategorisiert");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.household.partner_a = "Jonas".into();
        settings.currency_symbol = "CHF".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.household.partner_a, "Jonas");
        assert_eq!(loaded.currency_symbol, "CHF");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(
            paths.settings_file(),
            r#"{"household": {"partner_b": "Mia"}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.household.partner_a, "Andreas");
        assert_eq!(loaded.household.partner_b, "Mia");
        assert_eq!(loaded.household.offset_incomes, vec!["Kindergeld"]);
        assert_eq!(loaded.log_level, "warn");
    }

    #[test]
    fn test_invalid_household_rejected() {
        let mut settings = Settings::default();
        settings.household.partner_b = "Andreas".into();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.household.offset_incomes = vec!["Katharina".into()];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.household.partner_a = " ".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_allocation_config_trims_keys() {
        let mut settings = Settings::default();
        settings.household.partner_a = " Andreas ".into();
        settings.household.offset_incomes = vec![" Kindergeld".into(), "".into()];

        let config = settings.allocation_config();
        assert_eq!(config.partner_a, "Andreas");
        assert_eq!(config.offset_incomes, vec!["Kindergeld"]);
    }
}
