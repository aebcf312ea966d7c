use clap::{Args, Parser, Subcommand};
use pinesearch::cli::{self, SearchOptions};
use pinesearch::error::PineResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pinesearch")]
#[command(about = "Search daily-report workbooks by customer or transporter.")]
#[command(long_about = "PineSearch - Daily report lookup
Finds rows by customer or transporter across every sheet (one per day),
skips zero-unit rows, and totals units, cost and distinct routes per day.

COMMANDS:
  search  - Search a workbook and export the per-day summary
  sheets  - List the sheets of a workbook
  watch   - Re-run a search whenever the workbook is saved

EXAMPLES:
  pinesearch search report.xlsx ACME                  # Match customer column
  pinesearch search report.xlsx fastfr --transporter  # Match transporter column
  pinesearch search report.xlsx ACME -o acme.xlsx     # Summary as a workbook
  pinesearch watch report.xlsx ACME --no-export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SearchArgs {
    /// Path to the report workbook (.xlsx, .xlsm, .xls, .ods)
    file: PathBuf,

    /// Text to look for (case-insensitive, partial match; empty matches all)
    query: String,

    /// Match the transporter column (L) instead of the customer column (B)
    #[arg(short, long)]
    transporter: bool,

    /// YAML file mapping customer/route/transporter/units/cost columns
    #[arg(short, long, env = "PINESEARCH_LAYOUT")]
    layout: Option<PathBuf>,

    /// Summary destination (.txt or .xlsx); defaults to search_result.txt next to the binary
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write the summary file
    #[arg(long)]
    no_export: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl SearchArgs {
    fn into_options(self, show_rows: bool, json: bool) -> SearchOptions {
        SearchOptions {
            file: self.file,
            query: self.query,
            by_transporter: self.transporter,
            layout: self.layout,
            output: self.output,
            no_export: self.no_export,
            show_rows,
            json,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Search every sheet of a workbook.

Rows whose customer (or transporter) contains the query are kept, rows with
exactly zero units are dropped, and each day with a positive unit total is
listed with its units, cost and number of distinct routes.

On success the summary is written to search_result.txt next to the binary,
or to --output. A .xlsx destination produces a workbook instead of text.")]
    /// Search a workbook and export the per-day summary
    Search {
        #[command(flatten)]
        args: SearchArgs,

        /// Also list every matching row
        #[arg(long)]
        rows: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sheets of a workbook with their data row counts
    Sheets {
        /// Path to the report workbook
        file: PathBuf,

        /// YAML column layout (for the number of header rows)
        #[arg(short, long, env = "PINESEARCH_LAYOUT")]
        layout: Option<PathBuf>,
    },

    #[command(long_about = "Watch a workbook and re-run the search on every save.

Useful for the daily report that is updated in place during the day.
Press Ctrl+C to stop watching.")]
    /// Re-run a search whenever the workbook changes
    Watch {
        #[command(flatten)]
        args: SearchArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinesearch=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> PineResult<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Search { args, rows, json } => cli::search(args.into_options(rows, json)),

        Commands::Sheets { file, layout } => cli::sheets(file, layout),

        Commands::Watch { args } => cli::watch(args.into_options(false, false)),
    }
}
