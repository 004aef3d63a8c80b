//! Expense model
//!
//! Expenses are recorded in their native billing frequency and normalized to a
//! monthly equivalent whenever they are aggregated.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Payment account used when an expense names neither a payer nor an account
pub const UNKNOWN_ACCOUNT: &str = "Unbekanntes Konto";

/// How often an expense is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Parse a frequency, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "monatlich" | "m" => Some(Self::Monthly),
            "quarterly" | "vierteljährlich" | "q" => Some(Self::Quarterly),
            "yearly" | "annual" | "jährlich" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Interpret a stored value; anything unrecognized is monthly
    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Number of months one billing period covers
    pub fn months(&self) -> f64 {
        match self {
            Self::Monthly => 1.0,
            Self::Quarterly => 3.0,
            Self::Yearly => 12.0,
        }
    }

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a shared expense is divided between the two partners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Proportional to each partner's income
    #[default]
    Income,
    /// 50/50
    Equal,
}

impl SplitMode {
    /// Parse a split mode, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "einkommen" | "proportional" => Some(Self::Income),
            "equal" | "gleich" | "50/50" => Some(Self::Equal),
            _ => None,
        }
    }

    /// Interpret a stored value; anything unrecognized splits by income
    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Equal => "equal",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpret a stored shared flag ("ja"/"nein"); anything unrecognized is not shared
pub fn parse_shared_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "ja" | "j" | "yes" | "y" | "true" | "on" | "1"
    )
}

/// Stored representation of the shared flag
pub fn shared_flag_str(is_shared: bool) -> &'static str {
    if is_shared {
        "ja"
    } else {
        "nein"
    }
}

/// Validation errors for expense records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyCategory,
    NegativeAmount,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Expense must have a category"),
            Self::NegativeAmount => write!(f, "Expense amount cannot be negative"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// A recurring expense
///
/// `amount` is per billing period of `frequency`; use
/// [`ExpenseRecord::monthly_amount`] for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: String,
    /// Who pays, or the account that is debited
    pub person_or_account: String,
    /// Account the money leaves from; falls back to `person_or_account`
    #[serde(default)]
    pub paid_from_account: String,
    #[serde(default)]
    pub description: String,
    pub is_shared: bool,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub split_mode: SplitMode,
    pub amount: Money,
}

impl ExpenseRecord {
    /// Create a private monthly expense
    pub fn new(
        category: impl Into<String>,
        person_or_account: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            category: category.into(),
            person_or_account: person_or_account.into(),
            paid_from_account: String::new(),
            description: String::new(),
            is_shared: false,
            frequency: Frequency::Monthly,
            split_mode: SplitMode::Income,
            amount,
        }
    }

    /// Mark the expense as shared with the given split mode
    pub fn shared(mut self, split_mode: SplitMode) -> Self {
        self.is_shared = true;
        self.split_mode = split_mode;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_paid_from(mut self, account: impl Into<String>) -> Self {
        self.paid_from_account = account.into();
        self
    }

    /// Monthly equivalent of the amount
    pub fn monthly_amount(&self) -> Money {
        self.amount / self.frequency.months()
    }

    /// The account this expense is paid from
    pub fn payment_account(&self) -> &str {
        let paid_from = self.paid_from_account.trim();
        if !paid_from.is_empty() {
            return paid_from;
        }
        let payer = self.person_or_account.trim();
        if !payer.is_empty() {
            return payer;
        }
        UNKNOWN_ACCOUNT
    }

    /// Validate the expense record
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.category.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_amount() {
        let base = ExpenseRecord::new("Versicherung", "Andreas", Money::new(1200.0));
        assert_eq!(base.monthly_amount().value(), 1200.0);

        let quarterly = base.clone().with_frequency(Frequency::Quarterly);
        assert_eq!(quarterly.monthly_amount().value(), 400.0);

        let yearly = base.with_frequency(Frequency::Yearly);
        assert_eq!(yearly.monthly_amount().value(), 100.0);
        // Recomputing yields the same value
        assert_eq!(yearly.monthly_amount(), yearly.monthly_amount());
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(Frequency::parse("Yearly"), Some(Frequency::Yearly));
        assert_eq!(Frequency::parse(" quarterly "), Some(Frequency::Quarterly));
        assert_eq!(Frequency::parse("weekly"), None);
        assert_eq!(Frequency::from_stored("weekly"), Frequency::Monthly);
        assert_eq!(Frequency::from_stored(""), Frequency::Monthly);
    }

    #[test]
    fn test_split_mode_parsing() {
        assert_eq!(SplitMode::parse("EQUAL"), Some(SplitMode::Equal));
        assert_eq!(SplitMode::parse("income"), Some(SplitMode::Income));
        assert_eq!(SplitMode::parse("thirds"), None);
        assert_eq!(SplitMode::from_stored("thirds"), SplitMode::Income);
    }

    #[test]
    fn test_shared_flag() {
        assert!(parse_shared_flag("ja"));
        assert!(parse_shared_flag("Yes"));
        assert!(parse_shared_flag("on"));
        assert!(!parse_shared_flag("nein"));
        assert!(!parse_shared_flag("vielleicht"));
        assert!(!parse_shared_flag(""));
        assert_eq!(shared_flag_str(true), "ja");
        assert_eq!(shared_flag_str(false), "nein");
    }

    #[test]
    fn test_payment_account_fallbacks() {
        let expense = ExpenseRecord::new("Strom", "Andreas", Money::new(80.0));
        assert_eq!(expense.payment_account(), "Andreas");

        let expense = expense.with_paid_from("Gemeinschaftskonto");
        assert_eq!(expense.payment_account(), "Gemeinschaftskonto");

        let expense = ExpenseRecord::new("Strom", "  ", Money::new(80.0));
        assert_eq!(expense.payment_account(), UNKNOWN_ACCOUNT);
    }

    #[test]
    fn test_validation() {
        let expense = ExpenseRecord::new(" ", "Andreas", Money::new(1.0));
        assert_eq!(expense.validate(), Err(ExpenseValidationError::EmptyCategory));

        let expense = ExpenseRecord::new("Auto", "Andreas", Money::new(-1.0));
        assert_eq!(expense.validate(), Err(ExpenseValidationError::NegativeAmount));
    }
}
