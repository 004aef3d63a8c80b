//! Shared-cost allocation
//!
//! Computes the household aggregates and how the two partners split the
//! shared expenses. Family income such as child benefit first reduces every
//! shared expense pro rata; what remains is split per expense either by the
//! partners' income ratio or 50/50, and collected per payment account.
//!
//! The computation is a pure function of its inputs. Sums follow input order
//! and grouped output uses ordered maps, so identical inputs give identical
//! results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ExpenseRecord, IncomeRecord, Money, SplitMode};

/// Group key for records without a person or category
pub const UNKNOWN_KEY: &str = "Unbekannt";

/// Which incomes belong to the partners and which offset shared costs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub partner_a: String,
    pub partner_b: String,
    /// `IncomeRecord::person` values whose income reduces the shared costs
    pub offset_incomes: Vec<String>,
}

impl AllocationConfig {
    fn is_offset(&self, person: &str) -> bool {
        self.offset_incomes.iter().any(|o| o == person)
    }
}

/// What one partner contributes to the shared costs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerShare {
    pub name: String,
    /// The partner's monthly income
    pub income: Money,
    /// Share of expenses split 50/50
    pub equal_total: Money,
    /// Share of expenses split by income
    pub income_total: Money,
    /// `equal_total + income_total`
    pub share_total: Money,
}

impl PartnerShare {
    fn new(name: &str, income: Money) -> Self {
        Self {
            name: name.to_string(),
            income,
            equal_total: Money::zero(),
            income_total: Money::zero(),
            share_total: Money::zero(),
        }
    }

    fn add(&mut self, mode: SplitMode, amount: Money) {
        match mode {
            SplitMode::Equal => self.equal_total += amount,
            SplitMode::Income => self.income_total += amount,
        }
        self.share_total += amount;
    }
}

/// Amount each partner transfers to one account per month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRow {
    pub account: String,
    pub partner_a: Money,
    pub partner_b: Money,
    pub total: Money,
}

/// Household aggregates and the split of shared costs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    /// Sum of all incomes
    pub total_income: Money,
    /// Sum of all expenses, monthly equivalent
    pub total_expense: Money,
    /// `total_income - total_expense`
    pub remaining: Money,
    pub income_by_person: BTreeMap<String, Money>,
    /// Monthly equivalent per category
    pub expense_by_category: BTreeMap<String, Money>,

    /// Income of both partners together
    pub income_two: Money,
    /// Income that offsets shared costs (child benefit, ...)
    pub extra_family_income: Money,
    /// Monthly equivalent of all shared expenses
    pub shared_total: Money,
    /// `max(shared_total - extra_family_income, 0)`
    pub net_shared: Money,
    /// `net_shared / shared_total`, 0 without shared expenses
    pub reduction_factor: f64,

    pub partner_a: PartnerShare,
    pub partner_b: PartnerShare,

    /// Per-account transfers, sorted by account name
    pub transfer_overview: Vec<TransferRow>,
}

impl AllocationReport {
    /// Compute the report for the current snapshot of incomes and expenses
    pub fn compute(
        incomes: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        config: &AllocationConfig,
    ) -> Self {
        let total_income: Money = incomes.iter().map(|i| i.amount).sum();
        let total_expense: Money = expenses.iter().map(|e| e.monthly_amount()).sum();

        let mut income_by_person = BTreeMap::new();
        for income in incomes {
            *income_by_person
                .entry(group_key(&income.person))
                .or_insert_with(Money::zero) += income.amount;
        }

        let mut expense_by_category = BTreeMap::new();
        for expense in expenses {
            *expense_by_category
                .entry(group_key(&expense.category))
                .or_insert_with(Money::zero) += expense.monthly_amount();
        }

        let income_of = |person: &str| -> Money {
            incomes
                .iter()
                .filter(|i| i.person.trim() == person)
                .map(|i| i.amount)
                .sum()
        };
        let income_a = income_of(config.partner_a.as_str());
        let income_b = income_of(config.partner_b.as_str());
        let income_two = income_a + income_b;

        let extra_family_income: Money = incomes
            .iter()
            .filter(|i| config.is_offset(i.person.trim()))
            .map(|i| i.amount)
            .sum();

        let shared_total: Money = expenses
            .iter()
            .filter(|e| e.is_shared)
            .map(|e| e.monthly_amount())
            .sum();
        let net_shared = (shared_total - extra_family_income).max(Money::zero());
        let reduction_factor = if shared_total.is_positive() {
            net_shared.value() / shared_total.value()
        } else {
            0.0
        };

        let mut partner_a = PartnerShare::new(&config.partner_a, income_a);
        let mut partner_b = PartnerShare::new(&config.partner_b, income_b);
        let mut per_account: BTreeMap<String, (Money, Money)> = BTreeMap::new();

        for expense in expenses.iter().filter(|e| e.is_shared) {
            let base = expense.monthly_amount() * reduction_factor;
            if !base.is_positive() {
                continue;
            }

            // Without any partner income there is no ratio to split by
            let mode = if income_two.is_positive() {
                expense.split_mode
            } else {
                SplitMode::Equal
            };

            let (share_a, share_b) = match mode {
                SplitMode::Equal => (base / 2.0, base / 2.0),
                SplitMode::Income => (
                    base * (income_a.value() / income_two.value()),
                    base * (income_b.value() / income_two.value()),
                ),
            };

            partner_a.add(mode, share_a);
            partner_b.add(mode, share_b);

            let entry = per_account
                .entry(expense.payment_account().to_string())
                .or_insert((Money::zero(), Money::zero()));
            entry.0 += share_a;
            entry.1 += share_b;
        }

        let transfer_overview = per_account
            .into_iter()
            .map(|(account, (a, b))| TransferRow {
                account,
                partner_a: a,
                partner_b: b,
                total: a + b,
            })
            .collect();

        Self {
            total_income,
            total_expense,
            remaining: total_income - total_expense,
            income_by_person,
            expense_by_category,
            income_two,
            extra_family_income,
            shared_total,
            net_shared,
            reduction_factor,
            partner_a,
            partner_b,
            transfer_overview,
        }
    }
}

fn group_key(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        value.to_string()
    }
}
