use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use form_flatten::{ReportFormat, discover_csv_columns, flatten_csv, format_report};
use form_flatten_config::FlattenConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "form-flatten")]
#[command(version)]
#[command(about = "Flatten form-submission exports into one column per question")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an export into a flat table (both passes).
    Flatten(FlattenArgs),
    /// Detect columns and list question columns without writing output.
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Configuration file (.json, .yml or .yaml). Defaults to ./config.json if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input CSV, overriding `input_csv` from the configuration.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FlattenArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output CSV, overriding `output_csv` from the configuration.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the run report to this file.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Format of the report file.
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,
}

#[derive(Debug, Args)]
struct ColumnsArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Flatten(args) => run_flatten(args),
        Command::Columns(args) => run_columns(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(source: SourceArgs) -> Result<FlattenConfig, String> {
    let mut config = FlattenConfig::load_or_default(source.config.as_deref()).map_err(|err| {
        match &source.config {
            Some(path) => format!("Failed to load config '{}': {err}", path.display()),
            None => format!("Failed to load config: {err}"),
        }
    })?;
    if let Some(input) = source.input {
        config.input_csv = Some(input);
    }
    Ok(config)
}

fn run_flatten(args: FlattenArgs) -> Result<(), String> {
    let mut config = load_config(args.source)?;
    if let Some(output) = args.output {
        config.output_csv = Some(output);
    }

    let report = flatten_csv(&config).map_err(|err| err.to_string())?;

    if let Some(path) = &args.report {
        let rendered = format_report(&report, args.report_format)?;
        fs::write(path, rendered)
            .map_err(|err| format!("Failed to write report '{}': {err}", path.display()))?;
    }

    println!("Done. Wrote: {}", config.output_path().display());
    println!("{}", report.detected_columns_line());
    Ok(())
}

fn run_columns(args: ColumnsArgs) -> Result<(), String> {
    let config = load_config(args.source)?;
    let report = discover_csv_columns(&config).map_err(|err| err.to_string())?;
    let rendered = format_report(&report, args.format)?;
    print!("{rendered}");
    Ok(())
}
