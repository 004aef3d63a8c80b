//! CLI commands for reports
//!
//! Shows the dashboard and the monthly transfer overview.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::reports::Dashboard;
use crate::storage::Storage;

/// Show the household dashboard
pub fn handle_dashboard(storage: &Storage, settings: &Settings, json: bool) -> BudgetResult<()> {
    let dashboard = Dashboard::generate(storage, settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", dashboard.format_terminal());
    }

    Ok(())
}

/// Show how much each partner transfers to which account
pub fn handle_transfers(
    storage: &Storage,
    settings: &Settings,
    json: bool,
    output: Option<PathBuf>,
) -> BudgetResult<()> {
    let dashboard = Dashboard::generate(storage, settings)?;

    if let Some(path) = output {
        let file = File::create(&path)?;
        dashboard.export_transfers_csv(BufWriter::new(file))?;
        println!("Transfers exported to: {}", path.display());
    } else if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dashboard.report.transfer_overview)?
        );
    } else {
        print!("{}", dashboard.format_transfers());
    }

    Ok(())
}
