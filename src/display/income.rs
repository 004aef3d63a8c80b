//! Income display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{IncomeRecord, Money};

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Person")]
    person: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format incomes as a numbered table
///
/// The numbers are the positions `income edit` and `income remove` accept.
pub fn format_income_list(incomes: &[IncomeRecord], currency_symbol: &str) -> String {
    if incomes.is_empty() {
        return "No incomes found.\n".to_string();
    }

    let rows = incomes.iter().enumerate().map(|(index, income)| IncomeRow {
        number: index + 1,
        person: income.person.clone(),
        source: income.source.clone(),
        account: income.account.clone(),
        amount: income.amount.format_with_symbol(currency_symbol),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::single(4), Alignment::right());

    let total: Money = incomes.iter().map(|i| i.amount).sum();
    format!(
        "{}\nTotal: {}\n",
        table,
        total.format_with_symbol(currency_symbol)
    )
}
