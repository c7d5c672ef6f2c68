//! PepMap - peptide-to-genome coordinate mapping
//!
//! Maps peptide evidence observed in proteomics experiments onto
//! genomic coordinates through transcript/exon annotation.
//!
//! # Features
//!
//! - Strand-aware mapping with junction-spanning peptides split into
//!   ordered genomic intervals
//! - Transcript selection by coding-length fit, with a verification
//!   pass translating the genome back to amino acids
//! - Batch orchestration that records per-protein failures instead of
//!   aborting, with optional rayon parallelism
//!
//! # Example
//!
//! ```
//! use pepmap::core::{CoordinateMapper, ExonModel, PeptideRange, Protein, Strand};
//!
//! let model = ExonModel::from_coding_intervals(
//!     "TX1",
//!     Strand::Plus,
//!     "chr1",
//!     &[(100, 115), (200, 213)],
//! )?;
//!
//! let mut protein = Protein::new("P1", "MKTAYIAKQR");
//! let range = PeptideRange::new(&protein, 5, 7, "YIA")?;
//! protein.add_peptide(range);
//!
//! let mapper = CoordinateMapper::new(&model);
//! let mapping = mapper.map(&protein).unwrap();
//! let ranges = mapping.peptides[0].result.as_ref().unwrap();
//! // The peptide straddles the exon junction: two genomic intervals.
//! assert_eq!(ranges.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    AnnotationFilter, AnnotationSource, BatchOptions, BatchOutcome, CoordinateMapper, ExonModel,
    FailureKind, GenomeSequenceSource, GenomicRange, IdKind, PepMapError, PeptideRange, Protein,
    ProteinMapping, ProteinsCollection, Strand, TranscriptSelector, VerificationPass,
};
pub use formats::{bed, exon_table, fasta, psm};
