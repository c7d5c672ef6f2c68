//! Peptide-to-genome coordinate mapping
//!
//! Maps 1-based residue ranges along a protein onto genomic intervals
//! through the coding structure of a transcript.
//!
//! The algorithm:
//! 1. Convert a residue range [s, e] to 0-based nucleotide offsets in
//!    coding-only space: `nt_start = (s-1)*3`, `nt_end = e*3 - 1`.
//! 2. Query the coding-offset interval index for intersecting segments.
//! 3. For each hit, map the local offset onto genomic coordinates
//!    according to strand (minus strand counts down from the segment's
//!    genomic end).
//! 4. Emit one genomic range per hit, ordered 5′→3′ along the
//!    transcript, so a group concatenates back into contiguous coding
//!    sequence.

use crate::core::error::FailureKind;
use crate::core::exon::{CodingSegment, ExonModel, Strand};
use crate::core::protein::{PeptideRange, Protein};
use rust_lapper::{Interval, Lapper};

/// One genomic interval contributed by a mapped peptide range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRange {
    pub chrom: String,
    /// Genomic start (1-based, inclusive)
    pub start: u64,
    /// Genomic end (1-based, inclusive)
    pub end: u64,
    pub strand: Strand,
    /// Position of this interval within its group, in 5′→3′ transcript
    /// order (not raw genomic order)
    pub ordinal: usize,
}

impl GenomicRange {
    /// Width in nucleotides
    pub fn width(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// The mapped (or failed) genomic representation of one peptide range
#[derive(Debug, Clone, PartialEq)]
pub struct PeptideMapping {
    /// Index of the peptide in the input list; groups back-reference
    /// their peptide through it
    pub group: usize,
    /// Peptide start residue (1-based, inclusive)
    pub start: usize,
    /// Peptide end residue (1-based, inclusive)
    pub end: usize,
    /// Genomic ranges in 5′→3′ order, or the per-peptide failure
    pub result: Result<Vec<GenomicRange>, FailureKind>,
}

/// Mapping output for one protein against one transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinMapping {
    pub accession: String,
    pub transcript_id: String,
    pub peptides: Vec<PeptideMapping>,
}

impl ProteinMapping {
    /// Number of successfully mapped peptide groups
    pub fn mapped_count(&self) -> usize {
        self.peptides.iter().filter(|p| p.result.is_ok()).count()
    }

    /// Number of failed peptide groups
    pub fn failed_count(&self) -> usize {
        self.peptides.len() - self.mapped_count()
    }
}

/// Convert a 1-based inclusive residue range to 0-based inclusive
/// nucleotide offsets in coding-only space.
///
/// # Examples
/// ```
/// use pepmap::core::residue_span_to_nt;
///
/// assert_eq!(residue_span_to_nt(1, 1), (0, 2));
/// assert_eq!(residue_span_to_nt(3, 5), (6, 14));
/// ```
#[inline]
pub fn residue_span_to_nt(start: usize, end: usize) -> (u64, u64) {
    let nt_start = (start as u64 - 1) * 3;
    let nt_end = end as u64 * 3 - 1;
    (nt_start, nt_end)
}

/// Coordinate mapper for one transcript's coding model
///
/// Built once per transcript; mapping calls are pure and cheap. The
/// coding-offset space is indexed with a Lapper so junction-spanning
/// ranges find all contributing segments in one query.
pub struct CoordinateMapper {
    transcript_id: String,
    /// Coding segments in 5′→3′ transcript order
    ordered: Vec<CodingSegment>,
    /// Interval index: [coding_offset, coding_offset + width) → rank in
    /// `ordered`
    index: Lapper<u64, usize>,
    coding_len: u64,
}

impl CoordinateMapper {
    /// Build a mapper from an exon model.
    ///
    /// The model is reduced to its coding-only view internally; callers
    /// may pass either the full or the trimmed model.
    pub fn new(model: &ExonModel) -> Self {
        let coding = model.coding_only();
        let ordered: Vec<CodingSegment> = coding.transcript_order().into_iter().cloned().collect();
        let intervals: Vec<Interval<u64, usize>> = ordered
            .iter()
            .enumerate()
            .map(|(rank, seg)| Interval {
                start: seg.coding_offset,
                stop: seg.coding_offset + seg.width(),
                val: rank,
            })
            .collect();

        Self {
            transcript_id: coding.transcript_id().to_string(),
            index: Lapper::new(intervals),
            coding_len: coding.coding_len(),
            ordered,
        }
    }

    /// Transcript this mapper was built for
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Total coding length in nucleotides
    pub fn coding_len(&self) -> u64 {
        self.coding_len
    }

    /// Map all peptide ranges of a protein.
    ///
    /// Returns a protein-level `LengthMismatch` when the coding
    /// sequence cannot encode the full protein; otherwise every peptide
    /// gets an entry, failed groups marked individually. The caller
    /// decides whether either failure aborts anything; this never does.
    pub fn map(&self, protein: &Protein) -> Result<ProteinMapping, FailureKind> {
        if self.coding_len < protein.len() as u64 * 3 {
            return Err(FailureKind::LengthMismatch {
                protein_len: protein.len(),
                coding_nt: self.coding_len,
            });
        }

        let peptides = protein
            .peptides()
            .iter()
            .enumerate()
            .map(|(group, range)| self.map_range(group, range))
            .collect();

        Ok(ProteinMapping {
            accession: protein.accession().to_string(),
            transcript_id: self.transcript_id.clone(),
            peptides,
        })
    }

    /// Map a single residue range into its group of genomic intervals.
    ///
    /// Unlike [`map`](Self::map) this applies no protein-level length
    /// precondition, so a range lying beyond the coding region comes
    /// back as an `OutOfCodingRegion` group failure.
    pub fn map_range(&self, group: usize, range: &PeptideRange) -> PeptideMapping {
        let (nt_start, nt_end) = residue_span_to_nt(range.start(), range.end());

        // Lapper queries are half-open on the 3' side, which is exactly
        // the boundary convention for offsets landing on a segment edge.
        let mut hits: Vec<&Interval<u64, usize>> =
            self.index.find(nt_start, nt_end + 1).collect();
        hits.sort_unstable_by_key(|iv| iv.val);

        if hits.is_empty() {
            return PeptideMapping {
                group,
                start: range.start(),
                end: range.end(),
                result: Err(FailureKind::OutOfCodingRegion {
                    start: range.start(),
                    end: range.end(),
                }),
            };
        }

        let mut ranges = Vec::with_capacity(hits.len());
        for (ordinal, iv) in hits.into_iter().enumerate() {
            let seg = &self.ordered[iv.val];
            // Local offsets from the segment's 5' end, both inclusive.
            let lo = nt_start.max(iv.start) - iv.start;
            let hi = nt_end.min(iv.stop - 1) - iv.start;
            let (g_start, g_end) = match seg.strand {
                Strand::Plus => (seg.start + lo, seg.start + hi),
                Strand::Minus => (seg.end - hi, seg.end - lo),
            };
            ranges.push(GenomicRange {
                chrom: seg.chrom.clone(),
                start: g_start,
                end: g_end,
                strand: seg.strand,
                ordinal,
            });
        }

        PeptideMapping {
            group,
            start: range.start(),
            end: range.end(),
            result: Ok(ranges),
        }
    }
}
