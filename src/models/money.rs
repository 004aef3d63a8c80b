//! Money type for representing currency amounts
//!
//! Amounts are stored as `f64`: the allocation arithmetic divides by 3, 12 and
//! arbitrary income ratios, so a fixed-point representation would round at
//! every step. Display always rounds to two decimals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A monetary amount in the household's single currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a Money amount from a plain number
    ///
    /// # Examples
    /// ```
    /// use household_budget::models::Money;
    /// let amount = Money::new(10.5);
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the raw value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// The larger of two amounts
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    /// Parse a money amount from user or file input
    ///
    /// Accepts "10.50", "10,50", "1.234,56", "1,234.56", "€ 10.50", "10.50 EUR",
    /// exponents such as "1e3" or "1,5E3", and a leading sign. Empty,
    /// non-numeric and non-finite input is rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped.trim_start())
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped.trim_start())
        } else {
            (false, trimmed)
        };

        let invalid = || MoneyParseError::InvalidFormat(trimmed.to_string());

        let rest = strip_currency(rest);
        let (mantissa, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(index) => (&rest[..index], Some(&rest[index + 1..])),
            None => (rest, None),
        };

        let mut normalized = normalize_separators(mantissa);
        if normalized.is_empty()
            || !normalized
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(invalid());
        }

        if let Some(exponent) = exponent {
            let digits = exponent
                .strip_prefix(|c: char| c == '+' || c == '-')
                .unwrap_or(exponent);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            normalized.push('e');
            normalized.push_str(exponent);
        }

        let value: f64 = normalized.parse().map_err(|_| invalid())?;

        if !value.is_finite() {
            return Err(MoneyParseError::NotFinite(trimmed.to_string()));
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol after the amount
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, symbol)
        }
    }

    /// Shortest representation that reads back to the same value, used in CSV files
    pub fn to_field(&self) -> String {
        self.0.to_string()
    }
}

fn strip_currency(s: &str) -> &str {
    let s = s.trim();
    let s = s
        .strip_prefix('€')
        .or_else(|| s.strip_prefix('$'))
        .or_else(|| s.strip_prefix("EUR"))
        .unwrap_or(s)
        .trim();
    s.strip_suffix('€')
        .or_else(|| s.strip_suffix("EUR"))
        .unwrap_or(s)
        .trim()
}

/// Turn "1.234,56" / "1,234.56" / "12,5" into "1234.56" / "1234.56" / "12.5"
fn normalize_separators(s: &str) -> String {
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        _ => s.to_string(),
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid printing "-0.00" for tiny negative rounding residue
        let value = if self.0.abs() < 0.005 { 0.0 } else { self.0 };
        write!(f, "{:.2}", value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Money {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl Div<f64> for Money {
    type Output = Self;

    fn div(self, divisor: f64) -> Self {
        Self(self.0 / divisor)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
    NotFinite(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "Amount is empty"),
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::NotFinite(s) => write!(f, "Amount is not a finite number: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(10.5).to_string(), "10.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::new(-10.5).to_string(), "-10.50");
        assert_eq!(Money::new(-0.001).to_string(), "0.00");
        assert_eq!(Money::new(100.0 / 3.0).to_string(), "33.33");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::new(12.0).format_with_symbol("€"), "12.00 €");
        assert_eq!(Money::new(12.0).format_with_symbol(""), "12.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000.0);
        let b = Money::new(500.0);

        assert_eq!((a + b).value(), 1500.0);
        assert_eq!((a - b).value(), 500.0);
        assert_eq!((-a).value(), -1000.0);
        assert_eq!((a * 0.5).value(), 500.0);
        assert_eq!((a / 4.0).value(), 250.0);
    }

    #[test]
    fn test_parse_plain_and_decimal_comma() {
        assert_eq!(Money::parse("10.50").unwrap().value(), 10.5);
        assert_eq!(Money::parse("10,50").unwrap().value(), 10.5);
        assert_eq!(Money::parse(" 42 ").unwrap().value(), 42.0);
        assert_eq!(Money::parse("-7,25").unwrap().value(), -7.25);
    }

    #[test]
    fn test_parse_sign_and_exponent() {
        assert_eq!(Money::parse("+5").unwrap().value(), 5.0);
        assert_eq!(Money::parse("+ 12,50").unwrap().value(), 12.5);
        assert_eq!(Money::parse("1e3").unwrap().value(), 1000.0);
        assert_eq!(Money::parse("1,5E3").unwrap().value(), 1500.0);
        assert_eq!(Money::parse("-2.5e-1").unwrap().value(), -0.25);
        assert_eq!(Money::parse("1e+2 €").unwrap().value(), 100.0);
    }

    #[test]
    fn test_parse_thousands_separators() {
        assert_eq!(Money::parse("1.234,56").unwrap().value(), 1234.56);
        assert_eq!(Money::parse("1,234.56").unwrap().value(), 1234.56);
    }

    #[test]
    fn test_parse_currency_symbols() {
        assert_eq!(Money::parse("€ 12.50").unwrap().value(), 12.5);
        assert_eq!(Money::parse("12,50 €").unwrap().value(), 12.5);
        assert_eq!(Money::parse("12.50 EUR").unwrap().value(), 12.5);
        assert_eq!(Money::parse("$3").unwrap().value(), 3.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Money::parse(""), Err(MoneyParseError::Empty));
        assert_eq!(Money::parse("   "), Err(MoneyParseError::Empty));
        assert!(matches!(
            Money::parse("abc"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(Money::parse("nan").is_err());
        assert!(Money::parse("inf").is_err());
        assert!(Money::parse("1e").is_err());
        assert!(Money::parse("e5").is_err());
        assert!(Money::parse("1e5x").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(matches!(
            Money::parse("1e999"),
            Err(MoneyParseError::NotFinite(_))
        ));
    }

    #[test]
    fn test_field_round_trip() {
        for value in [0.0, 3000.0, 12.5, 1200.0 / 12.0, 0.1 + 0.2] {
            let money = Money::new(value);
            assert_eq!(Money::parse(&money.to_field()).unwrap(), money);
        }
    }

    #[test]
    fn test_max_and_sum() {
        assert_eq!(Money::new(-5.0).max(Money::zero()), Money::zero());
        assert_eq!(Money::new(5.0).max(Money::zero()), Money::new(5.0));

        let total: Money = vec![Money::new(1.0), Money::new(2.0), Money::new(3.0)]
            .into_iter()
            .sum();
        assert_eq!(total.value(), 6.0);
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(10.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "10.5");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
