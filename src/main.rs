//! colorset-dedupe CLI
//!
//! Collect colors from asset catalogs, storyboards and xibs, and merge them
//! into one deduplicated color catalog.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;

use colorset_dedupe::catalog::{default_output_dir, export};
use colorset_dedupe::group::group_colors;
use colorset_dedupe::logging::{LogConfig, init_logging};
use colorset_dedupe::naming::emission_order;
use colorset_dedupe::report::{build_report, debug_listing, format_report};
use colorset_dedupe::scanner::{
    SourceRead, assemble_scan, find_source_files_with_progress, read_source, scan,
};
use colorset_dedupe::types::{ExportConfig, OutputFormat, ScanConfig, ScanResult, SourceFiles};

#[derive(Parser)]
#[command(name = "colorset-dedupe")]
#[command(about = "Consolidate Xcode asset, storyboard and xib colors into one deduplicated catalog")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and report its colors (no files written)
    Scan {
        /// Project directory to scan (default: current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print every name of every group instead of the report
        #[arg(long)]
        debug_names: bool,
    },

    /// Scan a project and write Colors.xcassets and sample.html
    Export {
        /// Project directory to scan (default: current directory)
        path: Option<PathBuf>,

        /// Output directory (default: ~/Desktop/Outputs)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Skip writing sample.html
        #[arg(long)]
        no_html: bool,

        /// Skip writing Colors.xcassets
        #[arg(long)]
        no_catalog: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    Html,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Html => OutputFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Scan {
            path,
            format,
            max_depth,
            debug_names,
        } => cmd_scan(path, format.into(), max_depth, debug_names),
        Commands::Export {
            path,
            output,
            max_depth,
            no_html,
            no_catalog,
        } => cmd_export(path, output, max_depth, !no_html, !no_catalog),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// Resolve scan path: use provided path or the current directory.
fn resolve_scan_path(path: Option<PathBuf>) -> Result<PathBuf, String> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir()
            .map_err(|e| format!("Could not determine current directory: {}", e)),
    }
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb
}

// ============================================================================
// SCANNING
// ============================================================================

/// Discover, read and parse sources, with a spinner and progress bar.
fn scan_with_progress(config: &ScanConfig) -> Result<ScanResult, String> {
    // Phase 1: Discovery
    let sp = spinner("Discovering color sources...");
    let files = match find_source_files_with_progress(config, |scanned, found| {
        sp.set_message(format!("Scanned {} entries, found {} sources...", scanned, found));
    }) {
        Ok(files) => {
            sp.finish_with_message(format!(
                "Found {} colorsets and {} storyboards/xibs",
                files.asset_files.len(),
                files.document_files.len()
            ));
            files
        }
        Err(e) => {
            sp.finish_and_clear();
            return Err(e.to_string());
        }
    };

    // Phase 2: Reading (parallel), then parsing
    let (asset_reads, document_reads) = read_with_progress(&files);
    Ok(assemble_scan(asset_reads, document_reads))
}

fn read_with_progress(files: &SourceFiles) -> (Vec<SourceRead>, Vec<SourceRead>) {
    let pb = progress_bar(files.len() as u64, "Reading...");

    let read = |paths: &[PathBuf]| -> Vec<SourceRead> {
        paths
            .par_iter()
            .progress_with(pb.clone())
            .map(|path| (path.clone(), read_source(path)))
            .collect()
    };
    let asset_reads = read(files.asset_files.as_slice());
    let document_reads = read(files.document_files.as_slice());

    pb.finish_with_message("Done");
    (asset_reads, document_reads)
}

/// Discover, read and parse sources without progress output (machine formats).
fn scan_quiet(config: &ScanConfig) -> Result<ScanResult, String> {
    scan(config).map_err(|e| e.to_string())
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_scan(
    path: Option<PathBuf>,
    format: OutputFormat,
    max_depth: Option<usize>,
    debug_names: bool,
) -> Result<(), String> {
    let root = resolve_scan_path(path)?;
    let show_progress = format == OutputFormat::Human && !debug_names;

    if show_progress {
        eprintln!("Scanning: {}", root.display());
        eprintln!();
    }

    let config = ScanConfig {
        roots: vec![root],
        max_depth,
        ..Default::default()
    };

    let result = if show_progress {
        scan_with_progress(&config)?
    } else {
        scan_quiet(&config)?
    };

    let groups = group_colors(&result.assets, &result.documents);
    let resolved = emission_order(&groups);

    if debug_names {
        for line in debug_listing(&resolved) {
            println!("{}", line);
        }
        return Ok(());
    }

    let report = build_report(&result, &resolved);
    print!("{}", format_report(&report, format));

    Ok(())
}

fn cmd_export(
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    max_depth: Option<usize>,
    html: bool,
    catalog: bool,
) -> Result<(), String> {
    if !html && !catalog {
        return Err("Nothing to export: both --no-html and --no-catalog given".to_string());
    }

    let root = resolve_scan_path(path)?;
    eprintln!("Scanning: {}", root.display());
    eprintln!();

    let config = ScanConfig {
        roots: vec![root],
        max_depth,
        ..Default::default()
    };
    let result = scan_with_progress(&config)?;

    let groups = group_colors(&result.assets, &result.documents);
    let resolved = emission_order(&groups);
    let report = build_report(&result, &resolved);

    let export_config = ExportConfig {
        output_dir: output.unwrap_or_else(default_output_dir),
        html,
        catalog,
    };
    let summary = export(&resolved, &report.rows, &export_config).map_err(|e| e.to_string())?;

    println!();
    println!(
        "Done. {} unique colors from {} colorsets and {} documents.",
        report.rows.len(),
        report.asset_colors,
        report.documents
    );
    if let Some(dir) = &summary.catalog_dir {
        println!("Catalog: {} ({} colorsets)", dir.display(), summary.colorsets_written);
    }
    if let Some(html_path) = &summary.html_path {
        println!("Sample:  {}", html_path.display());
    }
    if !summary.duplicate_identifiers.is_empty() {
        println!(
            "Not written: {} colorsets whose name was already taken.",
            summary.duplicate_identifiers.len()
        );
    }
    if !report.skipped.is_empty() {
        println!("Skipped {} unreadable files (see warnings above).", report.skipped.len());
    }

    Ok(())
}
