//! Snapverify CLI
//!
//! ## Usage
//!
//! ```bash
//! snapverify compare baseline.png current.png      # exit 1 on mismatch
//! snapverify cleanup --comparisons                 # prune artifacts older than 30 days
//! snapverify data csv logins.csv --columns user    # inspect test rows
//! snapverify config                                # effective settings
//! ```

use clap::Parser;
use snapverify_cli::{
    handlers::{self, compare::require_match},
    load_artifacts, logging, Cli, CliConfig, CliResult, ColorChoice, Commands, DirOverrides,
    Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    logging::init(config.verbosity, config.use_color());

    match cli.command {
        Commands::Compare(args) => {
            let report = handlers::execute_compare(&config, &args)?;
            require_match(&report)
        }
        Commands::Cleanup(args) => {
            handlers::execute_cleanup(&config, &args);
            Ok(())
        }
        Commands::Data(args) => handlers::execute_data(&args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    let overrides = DirOverrides {
        screenshot_dir: cli.screenshot_dir.clone(),
        comparison_dir: cli.comparison_dir.clone(),
    };
    let artifacts = load_artifacts(cli.config.as_ref(), &overrides)?;

    Ok(CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_artifacts(artifacts))
}
