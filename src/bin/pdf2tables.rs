use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_table_grid::{
    DecodeFailurePolicy, DocumentTables, ExtractOptions, HeaderMode, PageSelection,
    extract_pdf_tables, write_csv, write_csv_to_string, write_json,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2tables",
    version,
    about = "Reconstruct tables from the text layout of PDF pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables and write them as CSV or JSON.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Treat the first candidate row of each page as the header.
    #[arg(long, conflicts_with = "no_header")]
    has_header: bool,

    /// Derive columns by clustering token positions instead of a header row.
    #[arg(long, conflicts_with = "has_header")]
    no_header: bool,

    /// Process pages on all cores.
    #[arg(long)]
    parallel: bool,

    /// Keep going when a page cannot be decoded.
    #[arg(long)]
    skip_broken_pages: bool,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Print every warning.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .context("failed to parse --pages")?;

    let header_mode = if args.has_header {
        HeaderMode::HasHeader
    } else if args.no_header {
        HeaderMode::NoHeader
    } else {
        HeaderMode::AutoDetect
    };

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("delimiter must be a single ASCII character"))?;

    Ok(ExtractOptions {
        pages,
        header_mode,
        decode_failure: if args.skip_broken_pages {
            DecodeFailurePolicy::SkipPage
        } else {
            DecodeFailurePolicy::Abort
        },
        parallel: args.parallel,
        delimiter,
        ..ExtractOptions::default()
    })
}

fn write_output(
    result: &DocumentTables,
    format: OutputFormat,
    output: Option<&Path>,
    delimiter: u8,
) -> Result<()> {
    match (format, output) {
        (OutputFormat::Csv, Some(path)) => write_csv(path, &result.tables, delimiter)
            .with_context(|| format!("failed to write '{}'", path.display())),
        (OutputFormat::Csv, None) => {
            let csv = write_csv_to_string(&result.tables, delimiter)?;
            io::stdout()
                .write_all(csv.as_bytes())
                .context("failed to write to stdout")
        }
        (OutputFormat::Json, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, result)?;
            writer.flush().context("failed to flush JSON output")
        }
        (OutputFormat::Json, None) => {
            let mut stdout = io::stdout().lock();
            write_json(&mut stdout, result)?;
            writeln!(stdout).context("failed to write to stdout")
        }
    }
}

fn log_warnings(result: &DocumentTables, verbose: bool) {
    if result.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", result.warnings.len());
    if verbose {
        for warning in &result.warnings {
            eprintln!(
                "  - {:?} page={:?}: {}",
                warning.code, warning.page, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<DocumentTables> {
    let options = parse_options(args)?;
    let result = extract_pdf_tables(&args.input, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    write_output(&result, args.format, args.output.as_deref(), options.delimiter)?;
    Ok(result)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_table_grid=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(result) => {
                log_warnings(&result, args.verbose);
                if result.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
