//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers for the dashboard and the data check.

use crate::storage::SkippedRow;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// List the rows the last load left out, one per line
pub fn format_skipped_rows(rows: &[(&'static str, SkippedRow)]) -> String {
    if rows.is_empty() {
        return "All rows are valid.\n".to_string();
    }

    let mut output = format!("{} row(s) could not be read:\n", rows.len());
    for (table, row) in rows {
        output.push_str(&format!(
            "  {}.csv line {}: {}\n",
            table, row.line, row.reason
        ));
    }
    output
}
