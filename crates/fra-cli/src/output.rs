//! Rendering of result rows and status messages.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Renders rows in the requested format and prints them to stdout.
pub fn print_output<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(rows, format)?;
    if !rendered.is_empty() {
        println!("{}", rendered.trim_end());
    }
    Ok(())
}

/// Renders rows as text.
///
/// `Minimal` keeps only the first row, as one JSON line.
pub fn render<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Table if rows.is_empty() => "No trades.".to_string(),
        OutputFormat::Table => Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::first()).with(Alignment::left()))
            .to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            {
                let mut writer = csv::Writer::from_writer(&mut buffer);
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
            String::from_utf8(buffer)?
        }
        OutputFormat::Minimal => match rows.first() {
            Some(row) => serde_json::to_string(row)?,
            None => String::new(),
        },
    };
    Ok(text)
}

/// Two decimals, or a dash when the value could not be computed.
pub fn display_amount(value: &Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Rate as a percentage with five decimals, or a dash.
pub fn display_percent(value: &Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.5}%", v * 100.0))
}

pub fn display_date<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Prints a success line to stdout.
pub fn print_success(message: &str) {
    println!("{} {message}", "✓".green());
}

/// Prints a problem line to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", "✗".red());
}

/// Prints a bold section title.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}
