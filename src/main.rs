use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use tsh_results::export;
use tsh_results::tsh::{self, DivisionReport};
use tsh_results::xlsx;

#[derive(Parser)]
#[command(name = "tsh-results")]
#[command(about = "Convert tsh tournament reports into per-game results (CSV, Excel)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert report files into one row per game
    Convert {
        /// Report files (default: every *.t file in the current directory)
        files: Vec<PathBuf>,

        /// Output file (.csv or .xlsx). CSV goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(short, long, env = "TSH_RESULTS_JOBS")]
        jobs: Option<usize>,

        /// Skip files that fail to parse instead of aborting the whole batch
        #[arg(long)]
        keep_going: bool,
    },

    /// Display rounds, players and per-round tallies of a report
    Info {
        /// Report file to inspect
        input: PathBuf,
    },

    /// Check that report files parse and pair cleanly
    Validate {
        /// Report files (default: every *.t file in the current directory)
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { files, output, jobs, keep_going } => {
            convert(files, output.as_deref(), jobs, keep_going)?;
        }
        Commands::Info { input } => {
            info(&input)?;
        }
        Commands::Validate { files } => {
            validate(files)?;
        }
    }

    Ok(())
}

/// Explicit files, or every `*.t` file in the current directory
fn report_files(files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files);
    }

    let mut found = Vec::new();
    for entry in glob::glob("*.t").context("Invalid report file pattern")? {
        found.push(entry.context("Failed to read directory entry")?);
    }
    found.sort();

    if found.is_empty() {
        anyhow::bail!("No report files given and no *.t files in the current directory");
    }
    Ok(found)
}

fn convert(
    files: Vec<PathBuf>,
    output: Option<&Path>,
    jobs: Option<usize>,
    keep_going: bool,
) -> Result<()> {
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let files = report_files(files)?;

    // Files share nothing, so parse in parallel; collect keeps input order
    let outcomes: Vec<_> = files
        .par_iter()
        .map(|file| (file, tsh::read_report_file(file)))
        .collect();

    let mut reports: Vec<DivisionReport> = Vec::with_capacity(outcomes.len());
    for (file, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) if keep_going => {
                log::error!("Skipping {}: {}", file.display(), e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to process {}", file.display()));
            }
        }
    }

    let results = reports.iter().flat_map(|r| r.reconciliation.results.iter());

    let Some(output) = output else {
        let stdout = std::io::stdout();
        export::write_csv(results, stdout.lock()).context("Failed to write CSV")?;
        return Ok(());
    };

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => {
            export::write_csv_file(results, output).context("Failed to write CSV file")?;
        }
        "xlsx" => {
            xlsx::write_divisions_to_xlsx(&reports, output).context("Failed to write Excel file")?;
        }
        _ => {
            anyhow::bail!("Unsupported output format: {}", ext);
        }
    }

    eprintln!(
        "Wrote {} games from {} divisions to {}",
        reports.iter().map(|r| r.reconciliation.results.len()).sum::<usize>(),
        reports.len(),
        output.display()
    );
    Ok(())
}

fn info(input: &Path) -> Result<()> {
    let report = tsh::read_report_file(input)
        .with_context(|| format!("Failed to process {}", input.display()))?;
    let rec = &report.reconciliation;

    println!("Report: {}", input.display());
    println!("Division: {}", report.division);
    println!("Rounds: {}", rec.dimensions.rounds);
    println!("Players: {}", rec.dimensions.players);
    println!("Games: {}", rec.results.len());
    println!("Byes: {}", rec.total_byes());
    println!();

    for tally in &rec.rounds {
        let flag = if tally.is_balanced() { "" } else { "  (unbalanced)" };
        println!(
            "  Round {}: {} games, {} byes{}",
            tally.round, tally.matches, tally.byes, flag
        );
    }

    Ok(())
}

fn validate(files: Vec<PathBuf>) -> Result<()> {
    let files = report_files(files)?;
    let mut failures = 0;

    for file in &files {
        match tsh::read_report_file(file) {
            Ok(report) => {
                let rec = &report.reconciliation;
                let unbalanced = rec.unbalanced_rounds().count();
                println!(
                    "{}: valid, {} games over {} rounds",
                    file.display(),
                    rec.results.len(),
                    rec.dimensions.rounds
                );
                if unbalanced > 0 {
                    println!("  {} unbalanced rounds", unbalanced);
                }
            }
            Err(e) => {
                failures += 1;
                println!("{}: {}", file.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed validation", failures, files.len());
    }
    Ok(())
}
