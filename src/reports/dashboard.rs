//! Household dashboard
//!
//! Runs the allocation over the loaded snapshot and renders it for the
//! terminal, as JSON or as a CSV transfer list.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::config::settings::Settings;
use crate::display::report::{double_separator, format_bar, format_percentage, separator};
use crate::display::transfer::format_transfer_table;
use crate::error::BudgetResult;
use crate::models::Money;
use crate::storage::Storage;

use super::allocation::AllocationReport;

const WIDTH: usize = 64;
const BAR_WIDTH: usize = 20;

/// Everything shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub report: AllocationReport,
    /// Number of malformed rows left out per table
    pub skipped_rows: BTreeMap<&'static str, usize>,
    #[serde(skip)]
    currency_symbol: String,
    #[serde(skip)]
    offset_incomes: Vec<String>,
}

impl Dashboard {
    /// Compute the dashboard from the repositories' current contents
    pub fn generate(storage: &Storage, settings: &Settings) -> BudgetResult<Self> {
        let incomes = storage.incomes.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let config = settings.allocation_config();

        let report = AllocationReport::compute(&incomes, &expenses, &config);

        let mut skipped_rows = BTreeMap::new();
        for (table, _) in storage.skipped_rows()? {
            *skipped_rows.entry(table).or_insert(0) += 1;
        }

        Ok(Self {
            report,
            skipped_rows,
            currency_symbol: settings.currency_symbol.clone(),
            offset_incomes: config.offset_incomes,
        })
    }

    /// Total number of rows left out of the computation
    pub fn skipped_total(&self) -> usize {
        self.skipped_rows.values().sum()
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self) -> String {
        let r = &self.report;
        let mut output = String::new();

        output.push_str("Household Overview\n");
        output.push_str(&double_separator(WIDTH));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>16}\n", "Total income:", self.money(r.total_income)));
        output.push_str(&format!(
            "{:<24} {:>16}\n",
            "Total expenses (monthly):",
            self.money(r.total_expense)
        ));
        output.push_str(&format!("{:<24} {:>16}\n", "Remaining:", self.money(r.remaining)));

        output.push_str("\nIncome by person\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        if r.income_by_person.is_empty() {
            output.push_str("  No incomes recorded.\n");
        }
        for (person, amount) in &r.income_by_person {
            output.push_str(&format!("  {:<22} {:>16}\n", person, self.money(*amount)));
        }

        output.push_str("\nExpenses by category (monthly)\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        if r.expense_by_category.is_empty() {
            output.push_str("  No expenses recorded.\n");
        }
        let max = r
            .expense_by_category
            .values()
            .map(|m| m.value())
            .fold(0.0, f64::max);
        for (category, amount) in &r.expense_by_category {
            output.push_str(&format!(
                "  {:<22} {:>16}  {}\n",
                category,
                self.money(*amount),
                format_bar(amount.value(), max, BAR_WIDTH)
            ));
        }

        output.push_str("\nShared costs\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "  {:<22} {:>16}\n",
            "Shared expenses:",
            self.money(r.shared_total)
        ));
        if !self.offset_incomes.is_empty() {
            output.push_str(&format!(
                "  {:<22} {:>16}  ({})\n",
                "Family income:",
                self.money(-r.extra_family_income),
                self.offset_incomes.join(", ")
            ));
        }
        output.push_str(&format!(
            "  {:<22} {:>16}  ({} of shared)\n",
            "To split:",
            self.money(r.net_shared),
            format_percentage(r.reduction_factor * 100.0)
        ));
        output.push('\n');
        for share in [&r.partner_a, &r.partner_b] {
            output.push_str(&format!(
                "  {:<22} {:>16}  (by income {}, equal {})\n",
                format!("{}:", share.name),
                self.money(share.share_total),
                self.money(share.income_total),
                self.money(share.equal_total)
            ));
        }

        output.push_str("\nTransfers per account\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        output.push_str(&self.format_transfers());

        let skipped = self.skipped_total();
        if skipped > 0 {
            output.push_str(&format!(
                "\nNote: {} malformed row(s) were left out. Run 'household check' for details.\n",
                skipped
            ));
        }

        output
    }

    /// Format only the transfer overview
    pub fn format_transfers(&self) -> String {
        if self.report.transfer_overview.is_empty() {
            return "No shared costs to transfer.\n".to_string();
        }

        let mut table = format_transfer_table(
            &self.report.transfer_overview,
            &self.report.partner_a.name,
            &self.report.partner_b.name,
            &self.currency_symbol,
        );
        table.push('\n');
        table
    }

    /// Export the transfer overview as CSV
    pub fn export_transfers_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "account",
            self.report.partner_a.name.as_str(),
            self.report.partner_b.name.as_str(),
            "total",
        ])?;
        for row in &self.report.transfer_overview {
            csv.write_record([
                row.account.clone(),
                format!("{:.2}", row.partner_a.value()),
                format!("{:.2}", row.partner_b.value()),
                format!("{:.2}", row.total.value()),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}
