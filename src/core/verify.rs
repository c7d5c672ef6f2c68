//! Verification pass: re-derive protein sequence from the genome
//!
//! Reconstructs the coding sequence of a transcript from genomic
//! segments (reverse-complemented on minus strand by the sequence
//! source), translates it, and scores a global alignment against the
//! protein. Used to validate mapper output and as a confirming signal
//! when transcript selection by length alone is ambiguous; never the
//! primary selection criterion.

use crate::core::annotation::GenomeSequenceSource;
use crate::core::dna::translate;
use crate::core::error::AnnotationResult;
use crate::core::exon::ExonModel;
use crate::core::mapper::GenomicRange;
use log::debug;

/// Alignment scoring: +1 match, -1 mismatch, -1 gap.
const MATCH: i32 = 1;
const MISMATCH: i32 = -1;
const GAP: i32 = -1;

/// Global alignment score between two residue sequences.
///
/// Plain Needleman-Wunsch over two rolling rows; quadratic time,
/// linear space. Sufficient for a per-transcript validation check.
///
/// # Examples
/// ```
/// use pepmap::core::verify::alignment_score;
///
/// assert_eq!(alignment_score(b"MKTAY", b"MKTAY"), 5);
/// assert_eq!(alignment_score(b"MKTAY", b"MKAAY"), 3);
/// assert_eq!(alignment_score(b"", b"MK"), -2);
/// ```
pub fn alignment_score(a: &[u8], b: &[u8]) -> i32 {
    let mut prev: Vec<i32> = (0..=b.len()).map(|j| j as i32 * GAP).collect();
    let mut curr = vec![0i32; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = (i as i32 + 1) * GAP;
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j] + if ca == cb { MATCH } else { MISMATCH };
            curr[j + 1] = sub.max(prev[j + 1] + GAP).max(curr[j] + GAP);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Fetch and concatenate the coding sequence of a model in 5′→3′
/// transcript order.
///
/// The sequence source is strand-aware, so each minus-strand segment
/// arrives already reverse-complemented; concatenation order alone
/// restores the transcript reading frame.
pub fn coding_sequence<G: GenomeSequenceSource>(
    genome: &G,
    model: &ExonModel,
) -> AnnotationResult<String> {
    let coding = model.coding_only();
    let mut seq = String::with_capacity(coding.coding_len() as usize);
    for seg in coding.transcript_order() {
        let piece = genome.fetch(&seg.chrom, seg.start, seg.end, seg.strand)?;
        seq.push_str(&piece);
    }
    Ok(seq)
}

/// Fetch and concatenate the nucleotides of one mapped peptide group.
///
/// Ranges are consumed in their emitted (5′→3′) order, so the result
/// is the peptide's contiguous coding-space sequence.
pub fn spliced_sequence<G: GenomeSequenceSource>(
    genome: &G,
    ranges: &[GenomicRange],
) -> AnnotationResult<String> {
    let mut seq = String::new();
    for range in ranges {
        let piece = genome.fetch(&range.chrom, range.start, range.end, range.strand)?;
        seq.push_str(&piece);
    }
    Ok(seq)
}

/// Re-derives protein sequence from genomic annotation and scores it
/// against the expected sequence
pub struct VerificationPass<'a, G: GenomeSequenceSource> {
    genome: &'a G,
}

impl<'a, G: GenomeSequenceSource> VerificationPass<'a, G> {
    pub fn new(genome: &'a G) -> Self {
        Self { genome }
    }

    /// Translate the model's coding sequence and globally align it
    /// against `protein_seq`; higher scores mean better agreement. A
    /// perfect transcript scores `protein_seq.len()` as i32.
    pub fn verify(&self, protein_seq: &str, model: &ExonModel) -> AnnotationResult<i32> {
        let cds = coding_sequence(self.genome, model)?;
        let translated = translate(&cds);
        let score = alignment_score(translated.as_bytes(), protein_seq.as_bytes());
        debug!(
            "verification of {}: translated {} residues against {}, score {}",
            model.transcript_id(),
            translated.len(),
            protein_seq.len(),
            score
        );
        Ok(score)
    }

    /// Among candidates, the transcript with the highest verification
    /// score. Intended to confirm or disambiguate length-based
    /// selection, not replace it.
    pub fn best_candidate<'m>(
        &self,
        protein_seq: &str,
        candidates: &'m [ExonModel],
    ) -> AnnotationResult<Option<(&'m ExonModel, i32)>> {
        let mut best: Option<(&'m ExonModel, i32)> = None;
        for model in candidates {
            let score = self.verify(protein_seq, model)?;
            let better = match best {
                None => true,
                Some((prev_model, prev_score)) => {
                    score > prev_score
                        || (score == prev_score
                            && model.transcript_id() < prev_model.transcript_id())
                }
            };
            if better {
                best = Some((model, score));
            }
        }
        Ok(best)
    }
}
