//! rowpdf CLI - one PDF per spreadsheet row
//!
//! A command-line tool that turns every row of an XLSX sheet into its own
//! printable PDF record.

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rowpdf::render::JsonFormat;
use rowpdf::{BatchEvent, ConvertOptions, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Spreadsheet rows to individual PDF records
#[derive(Parser)]
#[command(
    name = "rowpdf",
    author = "iyulab",
    version,
    about = "Turn every row of an Excel sheet into its own PDF",
    long_about = "rowpdf - one printable PDF record per spreadsheet row.\n\n\
                  Reads a sheet from an XLSX workbook and writes a titled two-column\n\
                  field/value table for each row."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one PDF per row of a sheet
    Convert {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Output folder
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long, conflicts_with = "sheet_index")]
        sheet: Option<String>,

        /// Sheet position, counted from 1 as listed by `sheets`
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        sheet_index: Option<u32>,

        /// File name prefix
        #[arg(short, long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Input workbook (.xlsx)
        input: PathBuf,
    },

    /// Show the columns and rows of a sheet
    Inspect {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of rows to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            sheet,
            sheet_index,
            prefix,
        } => {
            ensure_input(&input)?;

            let sheet = match sheet_index {
                Some(n) => Some(sheet_at(&input, n)?),
                None => sheet,
            };

            let mut options = ConvertOptions::new()
                .with_output_dir(&output)
                .with_prefix(prefix);
            if let Some(name) = sheet {
                options = options.with_sheet(name);
            }

            let mut pb: Option<ProgressBar> = None;
            let report = rowpdf::convert_all_with_progress(&input, &options, |event| match event {
                BatchEvent::SheetLoaded { sheet, rows, .. } => {
                    let bar = create_progress_bar(*rows as u64);
                    bar.set_message(sheet.to_string());
                    pb = Some(bar);
                }
                BatchEvent::RowWritten { .. } | BatchEvent::RowFailed { .. } => {
                    if let Some(bar) = &pb {
                        bar.inc(1);
                    }
                }
            })?;

            if let Some(bar) = pb {
                bar.finish_and_clear();
            }

            let mark = if report.is_complete() {
                "✓".green().bold()
            } else {
                "!".yellow().bold()
            };
            println!(
                "{} {} of {} documents created in {}",
                mark,
                report.created_count(),
                report.attempted,
                output.display()
            );

            for failure in &report.failures {
                println!("  {} {}", "✗".red().bold(), failure.error);
            }
        }

        Commands::Sheets { input } => {
            ensure_input(&input)?;

            let names = rowpdf::list_sheets(&input)?;
            if names.is_empty() {
                println!("{} No sheets found in workbook", "!".yellow().bold());
            }
            for (i, name) in names.iter().enumerate() {
                println!("{:>3}. {}", i + 1, name);
            }
        }

        Commands::Inspect {
            input,
            sheet,
            json,
            limit,
        } => {
            ensure_input(&input)?;

            let sheet = rowpdf::read_sheet(&input, sheet.as_deref())?;
            let shown = &sheet.rows[..limit.min(sheet.row_count())];

            if json {
                println!("{}", rowpdf::render::rows_to_json(shown, JsonFormat::Pretty)?);
                return Ok(());
            }

            println!("{}", "Sheet Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Sheet".bold(), sheet.name);
            println!("{}: {}", "Rows".bold(), sheet.row_count());
            println!("{}: {}", "Columns".bold(), sheet.column_count());

            println!("\n{}", "Columns".cyan().bold());
            println!("{}", "─".repeat(40));
            for (i, column) in sheet.columns.iter().enumerate() {
                println!("{:>3}. {}", i + 1, column);
            }

            for (i, row) in shown.iter().enumerate() {
                println!("\n{}", format!("Record {}", i + 1).cyan().bold());
                println!("{}", "─".repeat(40));
                for field in row {
                    println!("{}: {}", field.name.bold(), field.value);
                }
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Fail before touching the output folder when the workbook is missing.
fn ensure_input(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.is_file() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    Ok(())
}

/// Resolve a 1-based sheet position to its name.
fn sheet_at(input: &Path, position: u32) -> Result<String, Box<dyn std::error::Error>> {
    let names = rowpdf::list_sheets(input)?;
    let index = position as usize - 1;
    names.get(index).cloned().ok_or_else(|| {
        format!(
            "Sheet index {} out of range (workbook has {} sheets)",
            position,
            names.len()
        )
        .into()
    })
}

fn print_version() {
    println!("{} {}", "rowpdf".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("{}", version_details());
}

fn version_details() -> &'static str {
    "One printable PDF record per spreadsheet row\n\nSupported input: XLSX"
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
