//! Expense display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{shared_flag_str, ExpenseRecord, Money};

use super::report::truncate;

const DESCRIPTION_WIDTH: usize = 30;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Person/Account")]
    person_or_account: String,
    #[tabled(rename = "Paid from")]
    paid_from: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Shared")]
    shared: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Format expenses as a numbered table with their monthly equivalent
pub fn format_expense_list(expenses: &[ExpenseRecord], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses
        .iter()
        .enumerate()
        .map(|(index, expense)| ExpenseRow {
            number: index + 1,
            category: expense.category.clone(),
            person_or_account: expense.person_or_account.clone(),
            paid_from: expense.payment_account().to_string(),
            description: truncate(&expense.description, DESCRIPTION_WIDTH),
            shared: if expense.is_shared {
                format!("{} ({})", shared_flag_str(true), expense.split_mode)
            } else {
                shared_flag_str(false).to_string()
            },
            frequency: expense.frequency.to_string(),
            amount: expense.amount.format_with_symbol(currency_symbol),
            monthly: expense.monthly_amount().format_with_symbol(currency_symbol),
        });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(7..), Alignment::right());

    let monthly: Money = expenses.iter().map(|e| e.monthly_amount()).sum();
    let shared: Money = expenses
        .iter()
        .filter(|e| e.is_shared)
        .map(|e| e.monthly_amount())
        .sum();
    format!(
        "{}\nMonthly total: {} (shared: {})\n",
        table,
        monthly.format_with_symbol(currency_symbol),
        shared.format_with_symbol(currency_symbol)
    )
}

/// Format the category choices, one per line
pub fn format_category_list(categories: &[String]) -> String {
    let mut output = String::new();
    for category in categories {
        output.push_str(category);
        output.push('\n');
    }
    output
}
