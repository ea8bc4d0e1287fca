//! Data command handler

use crate::commands::{CsvArgs, DataArgs, DataCommand, SheetArgs};
use crate::error::CliResult;
use snapverify::{projected_parameters, CsvOptions, DataSource, QuoteMode};

/// Build the data source described by the arguments
#[must_use]
pub fn source_for(command: &DataCommand) -> DataSource {
    match command {
        DataCommand::Csv(CsvArgs {
            path,
            delimiter,
            escaped_quotes,
            ..
        }) => {
            let quotes = if *escaped_quotes {
                QuoteMode::Escaped
            } else {
                QuoteMode::Toggle
            };
            DataSource::Csv {
                path: path.clone(),
                options: CsvOptions::new()
                    .with_delimiter(*delimiter)
                    .with_quotes(quotes),
            }
        }
        DataCommand::Sheet(SheetArgs { path, sheet, .. }) => DataSource::sheet(path, sheet),
    }
}

fn columns_of(command: &DataCommand) -> &[String] {
    match command {
        DataCommand::Csv(args) => &args.columns,
        DataCommand::Sheet(args) => &args.columns,
    }
}

/// Render rows as pretty JSON: one object per row in header order, or one
/// array per row when columns are projected
pub fn render_json(command: &DataCommand) -> CliResult<String> {
    let rows = source_for(command).load()?;
    let columns = columns_of(command);
    if columns.is_empty() {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    let wanted: Vec<&str> = columns.iter().map(String::as_str).collect();
    Ok(serde_json::to_string_pretty(&projected_parameters(
        &rows, &wanted,
    )?)?)
}

/// Execute the data command
pub fn execute_data(args: &DataArgs) -> CliResult<()> {
    println!("{}", render_json(&args.source)?);
    Ok(())
}
