//! Annotation source interfaces
//!
//! The mapper core treats transcript annotation and genome sequence as
//! external collaborators behind narrow traits. Implementations may be
//! web services, databases, or flat files; the core only requires
//! batched lookup with graceful partial results and a version string
//! for cache keying.

use crate::core::error::{AnnotationResult, ExonModelError};
use crate::core::exon::{ExonModel, SegmentSpec, Strand};
use std::collections::HashMap;
use std::time::Duration;

/// Identifier namespaces an annotation source can be queried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    ProteinId,
    TranscriptId,
    UniprotId,
    GeneName,
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IdKind::ProteinId => "protein_id",
            IdKind::TranscriptId => "transcript_id",
            IdKind::UniprotId => "uniprot_id",
            IdKind::GeneName => "gene_name",
        };
        write!(f, "{}", s)
    }
}

/// Quality flag on a cross-reference mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingQuality {
    /// The cross-reference maps one-to-one
    Direct,
    /// The cross-reference is inferred through another resource
    Indirect,
}

/// One entry of a transcript's cross-reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    pub id: String,
    pub kind: IdKind,
    pub quality: MappingQuality,
}

/// Transcript annotation as delivered by a source
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptAnnotation {
    pub transcript_id: String,
    pub gene_name: Option<String>,
    pub strand: Strand,
    /// Segments in any order; sorted before model construction
    pub segments: Vec<SegmentSpec>,
    pub xrefs: Vec<CrossReference>,
}

impl TranscriptAnnotation {
    /// Build the validated exon model for this annotation.
    ///
    /// Segments are sorted by genomic start first; overlaps and other
    /// structural defects still fail hard.
    pub fn exon_model(&self) -> Result<ExonModel, ExonModelError> {
        let mut specs = self.segments.clone();
        specs.sort_by_key(|s| s.start);
        ExonModel::new(self.transcript_id.clone(), self.strand, specs)
    }
}

/// Filter predicate applied by annotation sources.
///
/// A single tagged variant type so every source evaluates filters the
/// same way; `Composite` is the AND of its parts.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationFilter {
    /// Match the transcript id or any cross-reference id exactly
    ByIdentifier(String),
    /// Match the annotated gene name
    ByGeneName(String),
    /// Keep only cross-references of the given quality; a transcript
    /// matches when at least one of its xrefs does
    ByMappingType(MappingQuality),
    /// All inner filters must match
    Composite(Vec<AnnotationFilter>),
}

impl AnnotationFilter {
    /// Evaluate the filter against one transcript annotation
    pub fn matches(&self, tx: &TranscriptAnnotation) -> bool {
        match self {
            AnnotationFilter::ByIdentifier(id) => {
                tx.transcript_id == *id || tx.xrefs.iter().any(|x| x.id == *id)
            }
            AnnotationFilter::ByGeneName(name) => tx.gene_name.as_deref() == Some(name.as_str()),
            AnnotationFilter::ByMappingType(quality) => {
                tx.xrefs.iter().any(|x| x.quality == *quality)
            }
            AnnotationFilter::Composite(filters) => filters.iter().all(|f| f.matches(tx)),
        }
    }
}

/// External transcript annotation collaborator.
///
/// `fetch` is batched: one call resolves every identifier of a mapping
/// run. Identifiers missing from the returned map are unresolved; that
/// is a normal partial result, not an error. Only source-level
/// breakage (I/O, whole-query timeout) is an `Err`.
pub trait AnnotationSource {
    /// Resolve identifiers to candidate transcripts.
    ///
    /// The optional `timeout` bounds the whole query; sources that
    /// cannot honor it may ignore it. Multiple candidates per
    /// identifier are the common case.
    fn fetch(
        &self,
        ids: &[String],
        kind: IdKind,
        filter: Option<&AnnotationFilter>,
        timeout: Option<Duration>,
    ) -> AnnotationResult<HashMap<String, Vec<TranscriptAnnotation>>>;

    /// Version or endpoint identity of the source, used in cache keys
    /// so updated annotation never satisfies a stale request.
    fn version(&self) -> String;
}

/// External genome sequence collaborator, used by the verification
/// pass only.
pub trait GenomeSequenceSource {
    /// Fetch the nucleotide sequence of a genomic interval (1-based,
    /// inclusive). Strand-aware: minus strand returns the reverse
    /// complement.
    fn fetch(&self, chrom: &str, start: u64, end: u64, strand: Strand) -> AnnotationResult<String>;
}

/// Exon model cache keyed by (transcript id, source version)
#[derive(Debug, Default)]
pub struct ExonModelCache {
    entries: HashMap<(String, String), ExonModel>,
}

impl ExonModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, transcript_id: &str, version: &str) -> Option<&ExonModel> {
        self.entries
            .get(&(transcript_id.to_string(), version.to_string()))
    }

    pub fn insert(&mut self, version: &str, model: ExonModel) {
        self.entries
            .insert((model.transcript_id().to_string(), version.to_string()), model);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
