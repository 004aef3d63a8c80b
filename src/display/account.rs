//! Account display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Account;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

/// Format the account registry as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows = accounts.iter().map(|account| AccountRow {
        name: account.name.clone(),
        owner: if account.owner.is_empty() {
            "(shared)".to_string()
        } else {
            account.owner.clone()
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
