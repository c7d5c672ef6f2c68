//! Error types for PepMap
//!
//! Two families of failures exist: hard errors (`PepMapError` and its
//! sub-enums) that abort the operation that raised them, and recoverable
//! per-item failures (`FailureKind`) that are recorded in batch results
//! so a single bad protein never aborts a whole mapping run.

use thiserror::Error;

/// Main error type for PepMap operations
#[derive(Debug, Error)]
pub enum PepMapError {
    /// Structurally invalid exon annotation
    #[error("Exon model error: {0}")]
    ExonModel(#[from] ExonModelError),

    /// Annotation source query errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Malformed input record
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors signaling a defect in the annotation delivered by a source.
///
/// These are hard precondition violations: a model that fails validation
/// is rejected for that fetch rather than allowed to produce a wrong
/// mapping.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExonModelError {
    /// Segment with start > end
    #[error("segment {chrom}:{start}-{end} has start > end")]
    InvertedSegment { chrom: String, start: u64, end: u64 },

    /// Segment starting at 0; genomic coordinates are 1-based
    #[error("segment {chrom}:0-{end} has a zero start; coordinates are 1-based")]
    ZeroStart { chrom: String, end: u64 },

    /// Segments out of ascending genomic order or overlapping
    #[error("segments ending at {prev_end} and starting at {next_start} on {chrom} overlap or are out of order")]
    OverlappingSegments {
        chrom: String,
        prev_end: u64,
        next_start: u64,
    },

    /// Segments on more than one chromosome for a single transcript
    #[error("transcript {transcript_id} spans multiple chromosomes ({first}, {second})")]
    MixedChromosomes {
        transcript_id: String,
        first: String,
        second: String,
    },

    /// Model with no segments at all
    #[error("transcript {0} has no segments")]
    Empty(String),
}

/// Errors raised by an annotation or genome sequence source
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Query-level failure (network, database, parse)
    #[error("annotation query failed: {0}")]
    Query(String),

    /// The whole batched query timed out
    #[error("annotation query timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// Requested genomic interval is not available from the sequence source
    #[error("no sequence available for {chrom}:{start}-{end}")]
    SequenceUnavailable { chrom: String, start: u64, end: u64 },

    /// I/O error while querying
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-record errors while loading peptide evidence
///
/// Recorded and returned alongside the successfully loaded records; a
/// malformed record never aborts the load of the remaining records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Observed peptide differs from the protein slice at the stated range
    #[error("peptide '{peptide}' does not match protein {accession} at [{start}, {end}]")]
    PeptideMismatch {
        accession: String,
        peptide: String,
        start: usize,
        end: usize,
    },

    /// Range outside [1, protein length]
    #[error("range [{start}, {end}] out of bounds for protein {accession} (length {length})")]
    RangeOutOfBounds {
        accession: String,
        start: usize,
        end: usize,
        length: usize,
    },

    /// PSM references a protein that was never loaded
    #[error("unknown protein accession: {0}")]
    UnknownProtein(String),

    /// Malformed record in an identification input
    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
}

/// Recoverable failure kinds carried in batch mapping results.
///
/// One of these marks a protein (or a single peptide group) as failed
/// inside an otherwise successful batch; the batch call itself always
/// returns one result per input protein.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FailureKind {
    /// Identifier absent from the annotation source response
    #[error("identifier not found in annotation source")]
    IdentifierNotFound,

    /// Identifier resolved but no transcript candidates survived filtering
    #[error("no transcript candidates after filtering")]
    NoCandidates,

    /// No candidate transcript has a coding length divisible by three
    #[error("no candidate transcript has a valid coding length")]
    SelectionFailed,

    /// Coding sequence too short to encode the protein
    #[error("coding length {coding_nt} nt cannot encode {protein_len} residues")]
    LengthMismatch { protein_len: usize, coding_nt: u64 },

    /// Peptide range intersects no coding segment
    #[error("peptide [{start}, {end}] falls outside the coding region")]
    OutOfCodingRegion { start: usize, end: usize },

    /// Annotation for the chosen transcript failed structural validation
    #[error("invalid annotation: {message}")]
    InvalidAnnotation { message: String },
}

/// Result type alias for PepMap operations
pub type Result<T> = std::result::Result<T, PepMapError>;

/// Result type alias for annotation source operations
pub type AnnotationResult<T> = std::result::Result<T, AnnotationError>;
