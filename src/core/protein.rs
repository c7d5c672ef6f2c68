//! Protein and peptide range value types
//!
//! A [`Protein`] is an accessioned amino-acid sequence with key-value
//! metadata and the peptide evidence attached to it. A [`PeptideRange`]
//! is an immutable 1-based inclusive interval along that sequence whose
//! observed peptide must equal the protein slice at the stated
//! coordinates; the invariant is checked at construction and never
//! again afterwards.

use crate::core::error::LoadError;
use std::collections::HashMap;

/// An identified peptide located along a protein sequence.
///
/// Coordinates are 1-based and inclusive, in protein (residue) space.
#[derive(Debug, Clone, PartialEq)]
pub struct PeptideRange {
    start: usize,
    end: usize,
    sequence: String,
    score: Option<f64>,
    spectrum_ref: Option<String>,
    charge: Option<u8>,
    attributes: HashMap<String, String>,
}

impl PeptideRange {
    /// Create a peptide range against its protein.
    ///
    /// Checks bounds and the substring invariant: `observed` must equal
    /// `protein.sequence()[start..=end]` (1-based).
    ///
    /// # Examples
    /// ```
    /// use pepmap::core::{PeptideRange, Protein};
    ///
    /// let protein = Protein::new("P1", "MKTAYIAKQR");
    /// let range = PeptideRange::new(&protein, 3, 5, "TAY").unwrap();
    /// assert_eq!(range.len(), 3);
    ///
    /// assert!(PeptideRange::new(&protein, 3, 5, "AAA").is_err());
    /// assert!(PeptideRange::new(&protein, 8, 12, "KQR").is_err());
    /// ```
    pub fn new(
        protein: &Protein,
        start: usize,
        end: usize,
        observed: &str,
    ) -> Result<Self, LoadError> {
        if start == 0 || start > end || end > protein.len() {
            return Err(LoadError::RangeOutOfBounds {
                accession: protein.accession().to_string(),
                start,
                end,
                length: protein.len(),
            });
        }
        // `get` also rejects ranges that split a non-ASCII character,
        // which a malformed FASTA record can smuggle into the sequence.
        let Some(slice) = protein.sequence().get(start - 1..end) else {
            return Err(LoadError::RangeOutOfBounds {
                accession: protein.accession().to_string(),
                start,
                end,
                length: protein.len(),
            });
        };
        if slice != observed {
            return Err(LoadError::PeptideMismatch {
                accession: protein.accession().to_string(),
                peptide: observed.to_string(),
                start,
                end,
            });
        }
        Ok(Self {
            start,
            end,
            sequence: observed.to_string(),
            score: None,
            spectrum_ref: None,
            charge: None,
            attributes: HashMap::new(),
        })
    }

    /// Attach a search-engine score
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Attach a spectrum reference
    pub fn with_spectrum_ref(mut self, spectrum_ref: impl Into<String>) -> Self {
        self.spectrum_ref = Some(spectrum_ref.into());
        self
    }

    /// Attach a precursor charge
    pub fn with_charge(mut self, charge: u8) -> Self {
        self.charge = Some(charge);
        self
    }

    /// Attach a free-form attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Start residue (1-based, inclusive)
    pub fn start(&self) -> usize {
        self.start
    }

    /// End residue (1-based, inclusive)
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of residues covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A peptide range is never empty by construction
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Observed amino-acid sequence
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Search-engine score, if any
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Spectrum reference, if any
    pub fn spectrum_ref(&self) -> Option<&str> {
        self.spectrum_ref.as_deref()
    }

    /// Precursor charge, if any
    pub fn charge(&self) -> Option<u8> {
        self.charge
    }

    /// Free-form attribute lookup
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

/// A protein sequence with metadata and attached peptide evidence
#[derive(Debug, Clone)]
pub struct Protein {
    accession: String,
    sequence: String,
    metadata: HashMap<String, String>,
    peptides: Vec<PeptideRange>,
}

impl Protein {
    /// Create a protein from accession and amino-acid sequence
    pub fn new(accession: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
            sequence: sequence.into(),
            metadata: HashMap::new(),
            peptides: Vec::new(),
        }
    }

    /// Accession identifier
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Amino-acid sequence
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Length in residues
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Set a metadata column
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Metadata column lookup
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Attach a peptide range built against this protein
    pub fn add_peptide(&mut self, range: PeptideRange) {
        self.peptides.push(range);
    }

    /// Attached peptide ranges, in attachment order
    pub fn peptides(&self) -> &[PeptideRange] {
        &self.peptides
    }

    /// Remove all attached peptide ranges
    pub fn clear_peptides(&mut self) {
        self.peptides.clear();
    }
}
