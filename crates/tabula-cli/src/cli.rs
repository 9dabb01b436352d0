//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Browse, export and gate tabular dashboard data.
#[derive(Debug, Parser)]
#[command(name = "tabula")]
#[command(version)]
#[command(about = "Browse, export and gate tabular dashboard data")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of a table view
    View(ViewArgs),

    /// Export the filtered rows of a table view
    Export(ExportArgs),

    /// Decide whether a user may see a protected view
    Gate(GateArgs),
}

/// Where the rows come from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// JSON file holding an array of row objects (or `{"data": [...]}`)
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// API path to GET under $TABULA_API_URL
    #[arg(long, value_name = "PATH")]
    pub api: Option<String>,
}

/// The table definition and the view state to apply to it.
#[derive(Debug, Clone, Args)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Table definition (YAML or JSON). Without one, every field of the
    /// first row becomes a column.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed the view from a query string, e.g. "?search=ann&page=2"
    #[arg(long, value_name = "QUERY")]
    pub url: Option<String>,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Dropdown filter, repeatable
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Earliest date (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<String>,

    /// Latest date (inclusive)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<String>,

    /// Click a column header; repeat to cycle ascending, descending, unsorted
    #[arg(long, value_name = "COLUMN")]
    pub sort: Vec<String>,

    /// Rows per page
    #[arg(long)]
    pub rows: Option<usize>,

    /// Page number
    #[arg(long, short = 'p')]
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Widest a text column may get
    #[arg(long, default_value_t = 32)]
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// File format
    #[arg(long, value_enum, default_value_t = FileFormat::Csv)]
    pub format: FileFormat,

    /// Directory to write data.csv / data.xlsx into
    #[arg(long, short = 'o', default_value = ".")]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct GateArgs {
    /// JSON file describing the signed-in user; omit for a signed-out user
    #[arg(long, value_name = "FILE")]
    pub user: Option<PathBuf>,

    /// Permission the view requires
    #[arg(long)]
    pub permission: Option<String>,

    /// Authentication is still loading
    #[arg(long)]
    pub loading: bool,

    /// Route to send denied users to
    #[arg(long, default_value = tabula_access::ACCESS_DENIED_ROUTE)]
    pub redirect: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
