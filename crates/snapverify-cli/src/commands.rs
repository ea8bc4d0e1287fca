//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use snapverify::DEFAULT_RETENTION_DAYS;
use std::path::PathBuf;

/// Snapverify: screenshot comparison, artifact retention and test data inspection
#[derive(Parser, Debug)]
#[command(name = "snapverify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML artifact configuration file
    #[arg(long, global = true, env = "SNAPVERIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the screenshot directory
    #[arg(long, global = true)]
    pub screenshot_dir: Option<PathBuf>,

    /// Override the diff image directory
    #[arg(long, global = true)]
    pub comparison_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a current screenshot with a baseline
    Compare(CompareArgs),

    /// Delete old screenshots and diff images
    Cleanup(CleanupArgs),

    /// Print data-driven test rows as JSON
    Data(DataArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline image
    pub baseline: PathBuf,

    /// Current image
    pub current: PathBuf,

    /// Name used for the diff image (defaults to the current file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Allowed fraction of differing pixels (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Summed RGB difference still counted as equal (0 = exact)
    #[arg(long, default_value = "0")]
    pub tolerance: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the cleanup command
#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Keep files modified within this many days
    #[arg(short, long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub days: u64,

    /// Also clean the diff image directory
    #[arg(long)]
    pub comparisons: bool,
}

/// Arguments for the data command
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Data source kind
    #[command(subcommand)]
    pub source: DataCommand,
}

/// Data sources
#[derive(Subcommand, Debug)]
pub enum DataCommand {
    /// Read a CSV file
    Csv(CsvArgs),

    /// Read a worksheet from an xlsx/xls/ods workbook
    Sheet(SheetArgs),
}

/// Arguments for `data csv`
#[derive(Args, Debug)]
pub struct CsvArgs {
    /// CSV file
    pub path: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Treat `""` inside quotes as a literal quote
    #[arg(long)]
    pub escaped_quotes: bool,

    /// Only print these columns, in this order
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

/// Arguments for `data sheet`
#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Workbook file
    pub path: PathBuf,

    /// Worksheet name
    #[arg(short, long)]
    pub sheet: String,

    /// Only print these columns, in this order
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show the built-in defaults instead of the effective configuration
    #[arg(long)]
    pub defaults: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect from terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
