//! tag_barcode
#![deny(missing_docs)]

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tag_barcode::{TagBarcodeArgs, TagBarcodePipeline};

/// Assign antibody tag reads to cell barcodes, count unique UMIs and flag
/// aggregate barcodes
#[derive(Parser, Debug)]
#[clap(name = "tag_barcode", version)]
struct Cli {
    /// R2 FASTQ of the tag library, optionally gzipped. Read names start
    /// with BARCODE:UMI
    #[clap(long)]
    fq: PathBuf,

    /// FASTA of antibody tag barcodes, all of the same length
    #[clap(long)]
    tag_barcode_fasta: PathBuf,

    /// Read pattern of R2 locating the tag barcode as its first C segment,
    /// e.g. L25C15
    #[clap(long)]
    r2_pattern: String,

    /// Cell barcodes called by the matched expression library, one per line
    #[clap(long)]
    match_barcode: PathBuf,

    /// Sample name, used as the prefix of every output file
    #[clap(long)]
    sample: String,

    /// Output directory
    #[clap(long, default_value = ".")]
    outdir: PathBuf,

    /// TOML file overriding the default counting parameters
    #[clap(long)]
    parameters: Option<PathBuf>,

    /// Number of worker threads
    #[clap(long)]
    threads: Option<usize>,

    /// Log debug messages
    #[clap(long)]
    verbose: bool,
}

impl From<Cli> for TagBarcodeArgs {
    fn from(cli: Cli) -> Self {
        TagBarcodeArgs {
            fq: cli.fq,
            tag_barcode_fasta: cli.tag_barcode_fasta,
            r2_pattern: cli.r2_pattern,
            match_barcode: cli.match_barcode,
            sample: cli.sample,
            outdir: cli.outdir,
            parameters: cli.parameters,
            threads: cli.threads,
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn inner_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    TagBarcodePipeline::run(&cli.into())?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match inner_main() {
        Ok(exit_code) => exit_code,
        Err(err) => {
            eprintln!("ERROR: {}", err.chain().join("\n\tCaused by: "));
            ExitCode::FAILURE
        }
    }
}
