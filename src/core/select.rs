//! Transcript selection by coding-length fit
//!
//! When a protein identifier resolves to several candidate transcripts,
//! the one whose coding length best matches the protein is chosen. A
//! perfect match carries one codon more than the protein has residues,
//! since the stop codon encodes no residue.

use crate::core::exon::ExonModel;
use log::debug;

/// Selects the best-fitting transcript for a protein length
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptSelector;

impl TranscriptSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick the candidate whose codon count is closest to
    /// `protein_len + 1`.
    ///
    /// Candidates whose coding length is not divisible by three are
    /// not translatable and are skipped. Ties are broken by the
    /// lexicographically smallest transcript identifier; that is a
    /// documented deterministic policy only, with no biological
    /// meaning. Returns `None` when no candidate is valid.
    ///
    /// # Examples
    /// ```
    /// use pepmap::core::{ExonModel, Strand, TranscriptSelector};
    ///
    /// let mk = |id: &str, nt: u64| {
    ///     ExonModel::from_coding_intervals(id, Strand::Plus, "chr1", &[(1, nt)]).unwrap()
    /// };
    /// // A 101-residue protein needs 306 nt: 101 codons plus a stop.
    /// let candidates = vec![mk("T300", 300), mk("T303", 303), mk("T306", 306)];
    /// let selector = TranscriptSelector::new();
    /// let chosen = selector.select(101, &candidates).unwrap();
    /// assert_eq!(chosen.transcript_id(), "T306");
    /// ```
    pub fn select<'a>(
        &self,
        protein_len: usize,
        candidates: &'a [ExonModel],
    ) -> Option<&'a ExonModel> {
        let expected = protein_len as i64 + 1;

        let best = candidates
            .iter()
            .filter_map(|model| {
                model
                    .codon_count()
                    .map(|codons| ((codons as i64 - expected).abs(), model))
            })
            .min_by(|(da, ma), (db, mb)| {
                da.cmp(db)
                    .then_with(|| ma.transcript_id().cmp(mb.transcript_id()))
            });

        match best {
            Some((delta, model)) => {
                debug!(
                    "selected transcript {} for protein length {} (codon delta {})",
                    model.transcript_id(),
                    protein_len,
                    delta
                );
                Some(model)
            }
            None => {
                debug!(
                    "no candidate with valid coding length among {} for protein length {}",
                    candidates.len(),
                    protein_len
                );
                None
            }
        }
    }
}
