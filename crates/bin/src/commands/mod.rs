//! Subcommand implementations.
//!
//! Each command runs against one attribute bag over the record file. The
//! record is saved after any command that changes the bag.

mod query;
mod read;
mod write;

use std::path::Path;

use schemaless::{AttributeBag, Record};
use serde_json::Value;

use crate::cli::{Cli, Commands};

/// Run the selected subcommand
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = cli.output();
    let mut record = load_record(&cli.record)?;
    let changed = {
        let mut bag = AttributeBag::new(&mut record, &cli.attribute);
        match &cli.command {
            Commands::Get(args) => {
                read::get(&bag, args, output)?;
                false
            }
            Commands::Show => {
                read::show(&bag, output)?;
                false
            }
            Commands::Count => {
                read::count(&bag, output)?;
                false
            }
            Commands::Keys => {
                read::keys(&bag, output)?;
                false
            }
            Commands::Where(args) => {
                query::run(bag.scope(), args, output)?;
                false
            }
            Commands::Set(args) => {
                write::set(&mut bag, args, output)?;
                true
            }
            Commands::Merge(args) => {
                write::merge(&mut bag, args, output)?;
                true
            }
            Commands::Forget(args) => {
                write::forget(&mut bag, args, output)?;
                true
            }
            Commands::Take(args) => {
                write::take(&mut bag, args, output)?;
                true
            }
            Commands::Pluck(args) => {
                write::pluck(&mut bag, args, output)?;
                true
            }
        }
    };

    if changed {
        record.save(&cli.record)?;
        tracing::info!(path = %cli.record.display(), attribute = %cli.attribute, "Saved record");
    }
    Ok(())
}

/// Load the record file, starting from an empty record if it does not exist yet.
fn load_record(path: &Path) -> schemaless::Result<Record> {
    if path.exists() {
        Record::load(path)
    } else {
        tracing::info!(path = %path.display(), "Record file not found, starting empty");
        Ok(Record::new())
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub(crate) fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
