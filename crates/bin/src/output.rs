//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Where and how command results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Output {
    /// Encode `value` as JSON, honouring `--pretty`.
    pub fn encode(&self, value: &impl Serialize) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    /// Print `value` as JSON.
    pub fn print_json(&self, value: &impl Serialize) -> Result<(), serde_json::Error> {
        println!("{}", self.encode(value)?);
        Ok(())
    }

    /// Print a single attribute value. Human output prints strings without
    /// quotes; everything else is printed as JSON.
    pub fn print_value(&self, value: &Value) -> Result<(), serde_json::Error> {
        match (self.format, value) {
            (OutputFormat::Human, Value::String(text)) => {
                println!("{text}");
                Ok(())
            }
            _ => self.print_json(value),
        }
    }
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let widths = column_widths(headers, rows);

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(widths.len())
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Max of header and cell lengths per column.
fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.len());
        }
    }
    widths
}
