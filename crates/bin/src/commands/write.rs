//! Commands that change the bag: set, merge, forget, take, pluck.

use schemaless::{AttributeBag, Record};
use serde_json::json;

use super::parse_value;
use crate::cli::{ForgetArgs, MergeArgs, PluckArgs, SetArgs, TakeArgs};
use crate::output::{Output, OutputFormat};

type Bag<'a> = AttributeBag<'a, Record>;

/// Set a value at a path
pub fn set(bag: &mut Bag<'_>, args: &SetArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    bag.set(&args.path, parse_value(&args.value))?;
    report(bag, output, &format!("Set {}.{}", bag.attribute_name(), args.path))
}

/// Shallow-merge a JSON object or array
pub fn merge(bag: &mut Bag<'_>, args: &MergeArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let before = bag.len();
    bag.merge(parse_value(&args.items))?;
    let added = bag.len() - before;
    report(bag, output, &format!("Merged into {} ({added} new keys)", bag.attribute_name()))
}

/// Remove paths
pub fn forget(bag: &mut Bag<'_>, args: &ForgetArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    bag.forget_many(&args.paths)?;
    report(bag, output, &format!("Forgot {} path(s)", args.paths.len()))
}

/// Keep the first (or last) N entries
pub fn take(bag: &mut Bag<'_>, args: &TakeArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let removed = bag.take(args.limit)?;
    report(bag, output, &format!("Removed {removed} entries"))
}

/// Replace each entry with the value at a path inside it
pub fn pluck(bag: &mut Bag<'_>, args: &PluckArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let found = bag.pluck(&args.path)?;
    report(
        bag,
        output,
        &format!("Plucked '{}' from {found} of {} entries", args.path, bag.len()),
    )
}

/// Human output prints `message`, JSON output prints the resulting bag.
fn report(bag: &Bag<'_>, output: Output, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output.format {
        OutputFormat::Human => println!("{message}"),
        OutputFormat::Json => output.print_json(&json!({
            "attribute": bag.attribute_name(),
            "items": bag.to_value(),
        }))?,
    }
    Ok(())
}
