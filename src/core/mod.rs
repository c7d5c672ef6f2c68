//! Core peptide-to-genome mapping functionality
//!
//! Value types, the exon model, the coordinate mapping algorithm,
//! transcript selection, batch orchestration, and the verification
//! pass.

mod annotation;
pub mod dna;
mod error;
mod exon;
mod mapper;
mod protein;
mod proteins;
mod select;
pub mod verify;

pub use annotation::{
    AnnotationFilter, AnnotationSource, CrossReference, ExonModelCache, GenomeSequenceSource,
    IdKind, MappingQuality, TranscriptAnnotation,
};
pub use error::{
    AnnotationError, AnnotationResult, ExonModelError, FailureKind, LoadError, PepMapError, Result,
};
pub use exon::{CodingSegment, ExonModel, SegmentSpec, Strand};
pub use mapper::{
    residue_span_to_nt, CoordinateMapper, GenomicRange, PeptideMapping, ProteinMapping,
};
pub use protein::{PeptideRange, Protein};
pub use proteins::{
    BatchOptions, BatchOutcome, BatchSummary, IdentificationSource, ProteinResult,
    ProteinsCollection, PsmRecord, SequenceSource,
};
pub use select::TranscriptSelector;
pub use verify::VerificationPass;
