use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;
use datalog::core::errors::{DatalogError, Result};
use datalog::{ChangeLog, LogRecord};

use super::store_helpers::open_store;
use crate::cli::output;

/// Execute the `datalog log` command.
///
/// Displays the change log in creation order with optional filters for
/// operation name, date, and entry count.
pub fn execute(operation: Option<&str>, since: Option<&str>, last: Option<usize>) -> Result<()> {
    let since_dt = since.map(parse_since).transpose()?;

    let store = open_store()?;
    let records = store.records(operation, since_dt)?;

    if records.is_empty() {
        output::header("datalog log");
        output::warning("No log records found");
        if operation.is_some() || since.is_some() {
            println!("  Try removing filters to see all records.");
        }
        return Ok(());
    }

    // Apply --last N (take from the end)
    let skip = last.map_or(0, |n| records.len().saturating_sub(n));
    let display = &records[skip..];

    output::header(&format!("datalog log ({} records)", display.len()));
    println!();

    for record in display {
        print_record(record);
    }

    Ok(())
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        DatalogError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        }
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DatalogError::InvalidConfig {
            detail: format!("Invalid date: '{s}'"),
        })?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Print a single log record as a formatted row.
fn print_record(record: &LogRecord) {
    let date = record.created_ts.format("%Y-%m-%d %H:%M:%S%.3f");
    let source = format!("{}@{}", record.source, record.source_version);

    println!(
        "  {} {} {:<20} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_operation(&record.operation_name),
        record.data,
        source.dimmed(),
    );
}

/// Color an operation name by what kind of write it is.
fn format_operation(name: &str) -> String {
    if name.starts_with("create_") || name.starts_with("store_") {
        name.green().to_string()
    } else if name.starts_with("delete_") {
        name.red().to_string()
    } else if name.starts_with("edit_") {
        name.yellow().to_string()
    } else {
        name.cyan().to_string()
    }
}
