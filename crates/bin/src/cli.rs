//! CLI argument definitions for the Schemaless binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::{Output, OutputFormat};

/// Read and edit the JSON attributes of a record file
#[derive(Parser, Debug)]
#[command(name = "schemaless")]
#[command(about = "Schemaless: path-addressable JSON attributes for record files")]
#[command(version)]
pub struct Cli {
    /// Record file holding a single JSON object
    #[arg(short, long, global = true, env = "SCHEMALESS_RECORD", default_value = "record.json")]
    pub record: PathBuf,

    /// Field of the record that holds the attributes
    #[arg(
        short,
        long,
        global = true,
        default_value = "extra_attributes",
        env = "SCHEMALESS_ATTRIBUTE"
    )]
    pub attribute: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output(&self) -> Output {
        Output {
            format: self.format,
            pretty: self.pretty,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value at a path
    Get(GetArgs),
    /// Set the value at a path
    Set(SetArgs),
    /// Shallow-merge a JSON object into the attributes
    Merge(MergeArgs),
    /// Remove one or more paths
    Forget(ForgetArgs),
    /// Print all attributes
    Show,
    /// Print the number of top-level attributes
    Count,
    /// Print the top-level attribute names
    Keys,
    /// Keep only the first N top-level attributes (the last N when negative)
    Take(TakeArgs),
    /// Replace every top-level attribute with the value at a path inside it
    Pluck(PluckArgs),
    /// Resolve filter arguments into predicates on the attribute
    Where(WhereArgs),
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Dot-delimited path, `*` matches every child
    pub path: String,

    /// Value printed when the path is missing (JSON, or a plain string)
    #[arg(short, long)]
    pub default: Option<String>,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Dot-delimited path
    pub path: String,

    /// Value to store (JSON, or a plain string)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for the merge command
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// JSON object or array to merge
    pub items: String,
}

/// Arguments for the forget command
#[derive(clap::Args, Debug)]
pub struct ForgetArgs {
    /// Paths to remove
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Arguments for the take command
#[derive(clap::Args, Debug)]
pub struct TakeArgs {
    /// Number of entries to keep
    #[arg(allow_negative_numbers = true)]
    pub limit: isize,
}

/// Arguments for the pluck command
#[derive(clap::Args, Debug)]
pub struct PluckArgs {
    /// Path to extract from each entry
    pub path: String,
}

/// Arguments for the where command
#[derive(clap::Args, Debug)]
pub struct WhereArgs {
    /// Join the predicates with OR instead of AND
    #[arg(long)]
    pub or: bool,

    /// Either a JSON object, `<name> <value>`, or `<name> <operator> <value>`
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
