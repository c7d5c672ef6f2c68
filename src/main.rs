//! PepMap CLI entry point
//!
//! Maps identified peptides onto genomic coordinates from three flat
//! inputs: a protein FASTA, a PSM table, and an exon-annotation table.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pepmap::core::{AnnotationFilter, BatchOptions, IdKind, ProteinsCollection};
use pepmap::formats::{bed, fasta::FastaSource, psm::PsmTableSource, TableAnnotationSource};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Identifier namespace for annotation lookup (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum IdKindArg {
    /// Protein accessions as used by the annotation source
    #[default]
    #[value(name = "protein")]
    Protein,
    /// Transcript identifiers (1:1, no selection needed)
    #[value(name = "transcript")]
    Transcript,
    /// UniProt accessions resolved through cross-references
    #[value(name = "uniprot")]
    Uniprot,
    /// Gene names (commonly 1:many)
    #[value(name = "gene")]
    Gene,
}

impl From<IdKindArg> for IdKind {
    fn from(arg: IdKindArg) -> Self {
        match arg {
            IdKindArg::Protein => IdKind::ProteinId,
            IdKindArg::Transcript => IdKind::TranscriptId,
            IdKindArg::Uniprot => IdKind::UniprotId,
            IdKindArg::Gene => IdKind::GeneName,
        }
    }
}

#[derive(Parser)]
#[command(name = "pepmap")]
#[command(about = "Map identified peptides onto genomic coordinates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map peptides from a FASTA + PSM table against an exon table
    Map {
        /// Protein FASTA file (.fasta or .fasta.gz)
        #[arg(short, long)]
        fasta: PathBuf,

        /// PSM table: accession, peptide, start, end, [score, spectrum, charge]
        #[arg(short, long)]
        psms: PathBuf,

        /// Exon annotation table
        #[arg(short, long)]
        annotation: PathBuf,

        /// Identifier namespace the accessions belong to
        #[arg(long = "id-kind", default_value = "protein")]
        id_kind: IdKindArg,

        /// Restrict candidate transcripts to one gene name
        #[arg(long)]
        gene: Option<String>,

        /// Annotation query timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Map proteins in parallel
        #[arg(long)]
        parallel: bool,

        /// Output BED12 file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Map {
            fasta,
            psms,
            annotation,
            id_kind,
            gene,
            timeout_ms,
            parallel,
            output,
        } => run_map(
            fasta, psms, annotation, id_kind, gene, timeout_ms, parallel, output,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_map(
    fasta: PathBuf,
    psms: PathBuf,
    annotation: PathBuf,
    id_kind: IdKindArg,
    gene: Option<String>,
    timeout_ms: Option<u64>,
    parallel: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let started = Instant::now();

    let sequences = FastaSource::new(&fasta);
    let identifications = PsmTableSource::new(&psms);
    let (collection, load_errors) = ProteinsCollection::from_sources(&sequences, &identifications)
        .with_context(|| format!("loading {} / {}", fasta.display(), psms.display()))?;
    if !load_errors.is_empty() {
        eprintln!("{} identification records rejected:", load_errors.len());
        for e in &load_errors {
            eprintln!("  {}", e);
        }
    }

    let source = TableAnnotationSource::from_path(&annotation)
        .with_context(|| format!("loading annotation table {}", annotation.display()))?;

    let options = BatchOptions {
        filter: gene.map(AnnotationFilter::ByGeneName),
        query_timeout: timeout_ms.map(Duration::from_millis),
        parallel,
    };
    let outcome = collection
        .map_all(id_kind.into(), &source, &options)
        .context("batch mapping failed")?;

    let written = match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let n = bed::write_bed12(&mut writer, &outcome)?;
            writer.flush()?;
            n
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let n = bed::write_bed12(&mut writer, &outcome)?;
            writer.flush()?;
            n
        }
    };

    eprintln!("{}", outcome.summary);
    eprintln!(
        "wrote {} BED12 records in {:.2?}",
        written,
        started.elapsed()
    );
    Ok(())
}
