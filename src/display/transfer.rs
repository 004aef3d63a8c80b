//! Transfer overview table

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::models::Money;
use crate::reports::TransferRow;

/// Format the per-account transfers with one column per partner
pub fn format_transfer_table(
    rows: &[TransferRow],
    partner_a: &str,
    partner_b: &str,
    currency_symbol: &str,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Account", partner_a, partner_b, "Total"]);

    for row in rows {
        builder.push_record([
            row.account.clone(),
            row.partner_a.format_with_symbol(currency_symbol),
            row.partner_b.format_with_symbol(currency_symbol),
            row.total.format_with_symbol(currency_symbol),
        ]);
    }

    let total_a: Money = rows.iter().map(|r| r.partner_a).sum();
    let total_b: Money = rows.iter().map(|r| r.partner_b).sum();
    builder.push_record([
        "TOTAL".to_string(),
        total_a.format_with_symbol(currency_symbol),
        total_b.format_with_symbol(currency_symbol),
        (total_a + total_b).format_with_symbol(currency_symbol),
    ]);

    let mut table = builder.build();
    table
        .with(Style::psql())
        .modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_table_has_partner_columns_and_total() {
        let rows = vec![
            TransferRow {
                account: "Gemeinschaftskonto".into(),
                partner_a: Money::new(300.0),
                partner_b: Money::new(200.0),
                total: Money::new(500.0),
            },
            TransferRow {
                account: "Konto Andreas".into(),
                partner_a: Money::new(12.5),
                partner_b: Money::new(12.5),
                total: Money::new(25.0),
            },
        ];

        let table = format_transfer_table(&rows, "Andreas", "Katharina", "€");

        assert!(table.contains("Andreas"));
        assert!(table.contains("Katharina"));
        assert!(table.contains("300.00 €"));
        assert!(table.contains("TOTAL"));
        assert!(table.contains("525.00 €"));
    }
}
