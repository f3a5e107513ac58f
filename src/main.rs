//! codonkit - Codon usage and sequence comparison
//!
//! ## Usage
//!
//! ```bash
//! codonkit fetch "Homo sapiens"
//! codonkit codons "Homo sapiens.fasta" Anura.fasta
//! codonkit compare Anura.fasta "Homo sapiens.fasta"
//! codonkit full Anura "Homo sapiens"
//! ```
//!
//! Downloaded records and comparison reports go to `--outdir`; codon
//! reports are written next to their input file.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, Level};

use codonkit::fetch::DEFAULT_BASE_URL;
use codonkit::pipeline::{CancelToken, DownloadOutcome, Pipeline, Settings};

/// codonkit - Fetch nucleotide records, count codons, compare sequences
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory for downloaded records and comparison reports
    #[arg(short = 'o', long = "outdir", global = true, default_value = ".")]
    outdir: PathBuf,

    /// Logging verbosity level
    #[arg(short = 'L', long = "level", global = true, default_value = "info")]
    level: Level,

    /// NCBI E-utilities base URL
    #[arg(long = "base-url", global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Seconds to wait between two consecutive downloads
    #[arg(long = "delay-secs", global = true, default_value = "6")]
    delay_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout-secs", global = true, default_value = "60")]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the best nucleotide match for an organism (skipped if present)
    Fetch {
        /// Scientific name, e.g. "Homo sapiens"
        organism: String,
    },
    /// Write a codon frequency report for each FASTA file
    Codons {
        /// FASTA files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Compare two FASTA files position by position
    Compare {
        first: PathBuf,
        second: PathBuf,
    },
    /// Download two organisms, compare them and analyze both
    Full {
        first: String,
        second: String,
    },
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            output_dir: self.outdir.clone(),
            base_url: self.base_url.clone(),
            settle_delay: Duration::from_secs(self.delay_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.level)?;

    if args.timeout_secs == 0 {
        anyhow::bail!("Timeout must be at least 1 second");
    }
    std::fs::create_dir_all(&args.outdir)?;

    let pipeline = Pipeline::from_settings(args.settings())?;

    match &args.command {
        Command::Fetch { organism } => match pipeline.download(organism)? {
            DownloadOutcome::Saved(path) => println!("{}", path.display()),
            DownloadOutcome::Skipped(path) => {
                println!("{} (already present)", path.display())
            }
        },
        Command::Codons { files } => {
            let results = pipeline.analyze_batch(files);
            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            for (_, result) in &results {
                if let Ok(output) = result {
                    println!("{}", output.display());
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} codon analyses failed", failed, results.len());
            }
        }
        Command::Compare { first, second } => {
            let output = pipeline.compare_files(first, second)?;
            println!("{}", output.display());
        }
        Command::Full { first, second } => {
            let report = pipeline.full_analysis(first, second, &CancelToken::new())?;
            if !report.is_complete() {
                anyhow::bail!(
                    "Full analysis of {} and {} finished with {} failed step(s)",
                    first,
                    second,
                    report.failures()
                );
            }
            info!("Full analysis of {} and {} complete", first, second);
        }
    }

    Ok(())
}
