//! Wiring of the whole run, from input files to output files.

use crate::aggregate::{AggregateFilter, AggregateRemovals};
use crate::classifier::{scan_reads, ScanShard, TagClassifier};
use crate::io::{fastq_records, write_aggregate_report};
use crate::matrix::CountMatrix;
use crate::parameters::TagParameters;
use crate::summary::SummaryStats;
use anyhow::{Context, Result};
use barcode::{MismatchTable, ReadPattern, TagReference, Whitelist, TAG_BARCODE_CODE};
use log::info;
use metric::JsonReport;
use std::path::PathBuf;
use umi::CollapsedTable;

/// Name of the assay the statistics file is filed under.
pub const ASSAY: &str = "sccite";

#[derive(Clone, Debug)]
pub struct TagBarcodeArgs {
    /// R2 FASTQ holding the tag barcodes, read names carry `BARCODE:UMI`.
    pub fq: PathBuf,
    pub tag_barcode_fasta: PathBuf,
    pub r2_pattern: String,
    /// Cell barcodes called upstream, one per line.
    pub match_barcode: PathBuf,
    pub sample: String,
    pub outdir: PathBuf,
    pub parameters: Option<PathBuf>,
    /// Overrides `threads` of the parameters file when set.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct TagBarcodeOutputs {
    pub raw_matrix: PathBuf,
    pub filtered_matrix: PathBuf,
    pub aggregate_barcodes: PathBuf,
    pub stats: PathBuf,
    pub scan: ScanShard,
    pub collapsed: CollapsedTable,
    pub filtered: CollapsedTable,
    pub removals: AggregateRemovals,
    pub summary: SummaryStats,
}

pub struct TagBarcodePipeline;

impl TagBarcodePipeline {
    pub fn run(args: &TagBarcodeArgs) -> Result<TagBarcodeOutputs> {
        let mut params = TagParameters::load(args.parameters.as_deref())?;
        if let Some(threads) = args.threads {
            params.threads = threads;
        }

        let reference = TagReference::from_fasta(&args.tag_barcode_fasta)?;
        info!(
            "loaded {} tag barcodes of length {} from {}",
            reference.len(),
            reference.barcode_len(),
            args.tag_barcode_fasta.display()
        );
        let pattern: ReadPattern = args.r2_pattern.parse()?;
        let slice = pattern.first_slice(TAG_BARCODE_CODE)?;
        let whitelist = Whitelist::from_path(&args.match_barcode)?;
        info!(
            "loaded {} cell barcodes from {}",
            whitelist.len(),
            args.match_barcode.display()
        );
        let table = MismatchTable::build(&reference, params.max_mismatches);
        info!(
            "{} tag barcode variants within {} mismatches",
            table.len(),
            table.max_mismatches()
        );
        let classifier = TagClassifier::new(
            &table,
            &whitelist,
            slice,
            reference.barcode_len(),
            pattern.as_str(),
        )?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.threads)
            .build()?;
        let reads = fastq_records(&args.fq)?;
        let scan = pool
            .install(|| scan_reads(reads, &classifier, params.chunk_size))
            .with_context(|| format!("Error scanning {}", args.fq.display()))?;
        info!(
            "{} reads, {} tag reads, {} tag reads in cells",
            scan.total_reads.count(),
            scan.tag_reads.count(),
            scan.incell_reads.count()
        );

        let collapsed = scan.umis.collapse();
        let totals = collapsed.antibody_totals();
        let (filtered, removals) = AggregateFilter::new(
            params.aggregate_count_threshold,
            params.aggregate_fraction_threshold,
        )
        .fraction_decimals(params.removal_fraction_decimals)
        .filter(&collapsed, &totals);
        let summary = SummaryStats::compute(
            &scan,
            &collapsed,
            whitelist.len(),
            &removals,
            params.percent_decimals,
        )?;

        std::fs::create_dir_all(&args.outdir)
            .with_context(|| args.outdir.display().to_string())?;
        let out = |suffix: &str| args.outdir.join(format!("{}.{suffix}", args.sample));
        let raw_matrix = out("tag_barcode.raw.csv.gz");
        let filtered_matrix = out("tag_barcode.filtered.csv.gz");
        let aggregate_barcodes = out("aggregate_barcodes.csv");
        let stats = out(&format!("{ASSAY}.tag_barcode.stats.json"));

        CountMatrix::new(&collapsed, &reference, &whitelist).write_csv_gz(&raw_matrix)?;
        CountMatrix::new(&filtered, &reference, &whitelist).write_csv_gz(&filtered_matrix)?;
        write_aggregate_report(&aggregate_barcodes, &removals.0, &whitelist, &reference)?;
        summary.report(&stats)?;
        for path in [&raw_matrix, &filtered_matrix, &aggregate_barcodes, &stats] {
            info!("wrote {}", path.display());
        }

        Ok(TagBarcodeOutputs {
            raw_matrix,
            filtered_matrix,
            aggregate_barcodes,
            stats,
            scan,
            collapsed,
            filtered,
            removals,
            summary,
        })
    }
}
