use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fastref_config::{init_tracing, load_for_root, FastrefConfig, LoggingConfig};
use serde::Serialize;

mod header;
mod scan;

use header::HeaderReport;
use scan::{role_label, verdict_label, ScanOverrides, ScanReport, Scanner};

#[derive(Parser)]
#[command(
    name = "fastref",
    version,
    about = "Syntactic class-reference resolution for Kotlin sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve every occurrence of the target's name under a directory or file
    Scan(ScanArgs),
    /// Print the package and import directives of a single file
    Header(HeaderArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Directory (or single file) to scan
    path: PathBuf,
    /// Fully-qualified target class; overrides `target` from the config
    #[arg(long)]
    target: Option<String>,
    /// Additional conflicting class (repeatable)
    #[arg(long = "conflict")]
    conflicts: Vec<String>,
    /// Config file (defaults to `fastref.toml` discovered at the scan root)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HeaderArgs {
    /// File to inspect
    file: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Scan(args) => {
            let config = load_config(&args.path, args.config.as_deref())?;
            init_tracing(&config.logging);

            let overrides = ScanOverrides {
                target: args.target,
                conflicts: args.conflicts,
            };
            let scanner = Scanner::from_config(&config, &overrides)?;
            let report = scanner.scan_path(&args.path)?;
            print_output(&report, args.json)?;
            Ok(0)
        }
        Command::Header(args) => {
            init_tracing(&LoggingConfig::default());
            let report = header::header_report(&args.file)?;
            print_output(&report, args.json)?;
            Ok(0)
        }
    }
}

fn load_config(scan_path: &Path, explicit: Option<&Path>) -> Result<FastrefConfig> {
    if let Some(path) = explicit {
        return Ok(FastrefConfig::load_from_path(path)?);
    }

    let root = if scan_path.is_dir() {
        scan_path
    } else {
        scan_path.parent().unwrap_or(scan_path)
    };
    let (config, _path) = load_for_root(root)?;
    Ok(config)
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    // Human output for key types. Everything else falls back to pretty JSON.
    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<ScanReport>() {
        for f in &report.findings {
            println!(
                "{}:{}:{}: {} {} => {}",
                f.file,
                f.line,
                f.column,
                role_label(f.role),
                f.text,
                verdict_label(f.verdict)
            );
        }
        println!(
            "summary: {} files, {} match, {} no_match, {} indeterminate",
            report.summary.files_scanned,
            report.summary.matches,
            report.summary.no_matches,
            report.summary.indeterminate
        );
    } else if let Some(report) = any.downcast_ref::<HeaderReport>() {
        if report.package.is_empty() {
            println!("package: <root>");
        } else {
            println!("package: {}", report.package);
        }
        for import in &report.imports {
            println!("{}", import.render());
        }
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}
