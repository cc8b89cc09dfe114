// Crosscheck CLI - reconcile two tabular datasets and report field mismatches

mod exit_codes;
mod report;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crosscheck_io::{from_csv_string, load_dataset, IoError};
use crosscheck_recon::{run, CompareConfig, Dataset, ReconError};

use exit_codes::{
    EXIT_CONFIG, EXIT_IO, EXIT_MISMATCHES, EXIT_PARSE, EXIT_SCHEMA, EXIT_SUCCESS, EXIT_USAGE,
};

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
}

#[derive(Parser)]
#[command(name = "xcheck")]
#[command(about = "Reconcile two tabular datasets and report field mismatches")]
#[command(version, long_version = long_version())]
#[command(after_help = "\
Exit code 1 indicates mismatches were found. Without --key, rows are aligned
by index and the comparison stops at the shorter dataset; with --key, rows
are aligned by key and a row absent on one side is reported against the
<missing> sentinel.

Examples:
  xcheck old.csv new.csv --compare name,quantity
  xcheck old.csv new.csv --compare name --key id
  xcheck old.csv new.csv --compare price --key sku,region --out csv --output diffs.csv
  xcheck old.csv new.csv --recipe audit.toml --out html --output report.html
  cat export.csv | xcheck - baseline.csv --compare total --key id")]
struct Cli {
    /// Left dataset (file path, or - for stdin)
    left: String,

    /// Right dataset (file path, or - for stdin)
    right: String,

    /// Columns to compare (comma-separated)
    #[arg(long, value_delimiter = ',')]
    compare: Vec<String>,

    /// Key column(s) for row alignment (comma-separated; omit to align by row index)
    #[arg(long, value_delimiter = ',')]
    key: Vec<String>,

    /// Compare only columns present in both datasets, ignoring column order
    #[arg(long)]
    ignore_column_order: bool,

    /// Comparison recipe TOML (alternative to --compare/--key)
    #[arg(long, conflicts_with_all = ["compare", "key"])]
    recipe: Option<PathBuf>,

    /// Output format
    #[arg(long, alias = "format", default_value = "text", value_enum)]
    out: OutputFormat,

    /// Output file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// CSV delimiter (sniffed per file when omitted)
    #[arg(long)]
    delimiter: Option<char>,

    /// Quiet mode - suppress stderr summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Html,
    Json,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn from_recon(err: ReconError) -> Self {
        let code = match &err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
            _ => EXIT_SCHEMA,
        };
        Self {
            code,
            message: err.to_string(),
            hint: None,
        }
    }

    fn from_load(err: IoError) -> Self {
        let code = match &err {
            IoError::Read { .. } => EXIT_IO,
            IoError::Parse { .. } | IoError::Empty { .. } => EXIT_PARSE,
            IoError::Schema(_) => EXIT_SCHEMA,
        };
        Self {
            code,
            message: err.to_string(),
            hint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_compare(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("error: {}", e.message);
            }
            if let Some(hint) = &e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn run_compare(cli: Cli) -> Result<u8, CliError> {
    if cli.left == "-" && cli.right == "-" {
        return Err(CliError::args("only one side may read from stdin"));
    }

    let delimiter = cli.delimiter.map(|c| c as u8);
    let left = load_side(&cli.left, delimiter)?;
    let right = load_side(&cli.right, delimiter)?;

    let mut config = match &cli.recipe {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("{}: {e}", path.display())))?;
            CompareConfig::from_toml(&content).map_err(CliError::from_recon)?
        }
        None => {
            if cli.compare.is_empty() {
                return Err(CliError::args("--compare is required (or provide --recipe)")
                    .with_hint("e.g. --compare name,quantity"));
            }
            let mut config = CompareConfig::positional(cli.compare.clone());
            if !cli.key.is_empty() {
                config.keys = Some(cli.key.clone());
            }
            config
        }
    };
    config.ignore_column_order |= cli.ignore_column_order;

    let report = run(&config, &left, &right).map_err(CliError::from_recon)?;

    let bytes = match cli.out {
        OutputFormat::Text => report::render_text(&report),
        OutputFormat::Csv => report::render_csv(&report)?,
        OutputFormat::Html => report::render_html(&report),
        OutputFormat::Json => report::render_json(&report)?,
    };

    match &cli.output {
        Some(path) => std::fs::write(path, &bytes)
            .map_err(|e| CliError::io(format!("{}: {e}", path.display())))?,
        None => io::stdout()
            .write_all(&bytes)
            .map_err(|e| CliError::io(e.to_string()))?,
    }

    if !cli.quiet {
        let s = &report.summary;
        eprintln!("left:  {} rows ({})", s.left_rows, cli.left);
        eprintln!("right: {} rows ({})", s.right_rows, cli.right);
        eprintln!("mode: {}", report.meta.mode);
        eprintln!("compared: {}", s.compared);
        if s.left_only > 0 {
            eprintln!("left_only: {}", s.left_only);
        }
        if s.right_only > 0 {
            eprintln!("right_only: {}", s.right_only);
        }
        eprintln!("mismatches: {}", s.mismatches);
    }

    if report.summary.mismatches > 0 {
        return Ok(EXIT_MISMATCHES);
    }
    Ok(EXIT_SUCCESS)
}

fn load_side(source: &str, delimiter: Option<u8>) -> Result<Dataset, CliError> {
    if source == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::io(format!("stdin: {e}")))?;
        from_csv_string("stdin", &content, delimiter).map_err(CliError::from_load)
    } else {
        load_dataset(&PathBuf::from(source), delimiter).map_err(CliError::from_load)
    }
}
