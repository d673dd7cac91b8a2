//! Read-only commands: get, show, count, keys.

use schemaless::{AttributeBag, Record};
use serde_json::{Value, json};

use super::parse_value;
use crate::cli::GetArgs;
use crate::output::{Output, OutputFormat};

type Bag<'a> = AttributeBag<'a, Record>;

/// Print the value at a path, the default, or `null`
pub fn get(bag: &Bag<'_>, args: &GetArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let value = match (bag.get(&args.path), &args.default) {
        (Some(value), _) => value,
        (None, Some(default)) => parse_value(default),
        (None, None) => {
            tracing::debug!(path = %args.path, "Path not set");
            Value::Null
        }
    };
    output.print_value(&value)?;
    Ok(())
}

/// Print the whole bag
pub fn show(bag: &Bag<'_>, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    output.print_json(bag)?;
    Ok(())
}

/// Print the number of top-level entries
pub fn count(bag: &Bag<'_>, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    match output.format {
        OutputFormat::Human => println!("{}", bag.count()),
        OutputFormat::Json => output.print_json(&json!({ "count": bag.count() }))?,
    }
    Ok(())
}

/// Print the top-level keys
pub fn keys(bag: &Bag<'_>, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    match output.format {
        OutputFormat::Human => {
            for key in bag.keys() {
                println!("{key}");
            }
        }
        OutputFormat::Json => {
            let keys: Vec<&String> = bag.keys().collect();
            output.print_json(&keys)?;
        }
    }
    Ok(())
}
