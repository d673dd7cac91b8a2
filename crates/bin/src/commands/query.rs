//! The where command: resolve filter arguments into predicates.

use schemaless::query::{AttributeScope, Combine, Predicates, ScopeArgs};
use serde_json::Value;

use super::parse_value;
use crate::cli::WhereArgs;
use crate::output::{Output, OutputFormat, print_table};

/// Resolve and print the predicates for `args`
pub fn run(scope: AttributeScope, args: &WhereArgs, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let values: Vec<Value> = args.args.iter().map(|arg| parse_value(arg)).collect();
    let scope_args = ScopeArgs::from_values(&values).map_err(schemaless::Error::from)?;
    let combine = if args.or { Combine::Or } else { Combine::And };
    let predicates = scope.apply(Predicates::new(), scope_args, combine);

    match output.format {
        OutputFormat::Human if predicates.is_empty() => println!("(no predicates)"),
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = predicates
                .iter()
                .map(|p| {
                    vec![
                        p.combine.to_string(),
                        p.path.clone(),
                        p.operator.to_string(),
                        p.value.to_string(),
                    ]
                })
                .collect();
            print_table(&["COMBINE", "PATH", "OPERATOR", "VALUE"], &rows);
        }
        OutputFormat::Json => output.print_json(&predicates)?,
    }
    Ok(())
}
