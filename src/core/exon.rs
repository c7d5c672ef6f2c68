//! Exon model: the coding structure of one transcript
//!
//! An [`ExonModel`] holds the ordered genomic segments of a transcript
//! together with cumulative coding offsets, which is everything the
//! coordinate mapper needs to place a coding-space nucleotide offset on
//! the genome. Segments are stored sorted by genomic position ascending
//! regardless of strand; 5′→3′ transcript order is derived from the
//! strand when walking the model.
//!
//! Structural validation happens at construction. A model that fails it
//! signals a defect in the annotation source and is rejected outright.

use crate::core::error::ExonModelError;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Get the complement strand
    ///
    /// # Examples
    /// ```
    /// use pepmap::core::Strand;
    /// assert_eq!(Strand::Plus.complement(), Strand::Minus);
    /// assert_eq!(Strand::Minus.complement(), Strand::Plus);
    /// ```
    pub fn complement(&self) -> Self {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
        }
    }

    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use pepmap::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Plus));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Minus));
    /// assert_eq!(Strand::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Parse strand from a signed convention (1 / -1), as annotation
    /// services commonly deliver it
    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Strand::Plus),
            -1 => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Input description of one segment, as delivered by an annotation source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpec {
    pub chrom: String,
    /// Genomic start (1-based, inclusive)
    pub start: u64,
    /// Genomic end (1-based, inclusive)
    pub end: u64,
    /// Whether the segment is (partly) translated
    pub is_coding: bool,
}

impl SegmentSpec {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, is_coding: bool) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            is_coding,
        }
    }
}

/// One validated segment of an exon model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingSegment {
    pub chrom: String,
    /// Genomic start (1-based, inclusive)
    pub start: u64,
    /// Genomic end (1-based, inclusive)
    pub end: u64,
    pub strand: Strand,
    pub is_coding: bool,
    /// Coding nucleotides accumulated before this segment in 5′→3′
    /// transcript order; zero for non-coding segments
    pub coding_offset: u64,
}

impl CodingSegment {
    /// Width in nucleotides (inclusive coordinates)
    pub fn width(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Ordered segment collection for one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonModel {
    transcript_id: String,
    strand: Strand,
    segments: Vec<CodingSegment>,
}

impl ExonModel {
    /// Build a model from annotation-source segments.
    ///
    /// Segments must arrive sorted by genomic start ascending, without
    /// overlaps, all on one chromosome; anything else is a hard
    /// [`ExonModelError`]. Coding offsets are assigned in 5′→3′
    /// transcript order (ascending genomic order on plus strand,
    /// descending on minus).
    pub fn new(
        transcript_id: impl Into<String>,
        strand: Strand,
        specs: Vec<SegmentSpec>,
    ) -> Result<Self, ExonModelError> {
        let transcript_id = transcript_id.into();
        if specs.is_empty() {
            return Err(ExonModelError::Empty(transcript_id));
        }

        let chrom = specs[0].chrom.clone();
        for spec in &specs {
            if spec.start == 0 {
                return Err(ExonModelError::ZeroStart {
                    chrom: spec.chrom.clone(),
                    end: spec.end,
                });
            }
            if spec.start > spec.end {
                return Err(ExonModelError::InvertedSegment {
                    chrom: spec.chrom.clone(),
                    start: spec.start,
                    end: spec.end,
                });
            }
            if spec.chrom != chrom {
                return Err(ExonModelError::MixedChromosomes {
                    transcript_id,
                    first: chrom,
                    second: spec.chrom.clone(),
                });
            }
        }
        for pair in specs.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(ExonModelError::OverlappingSegments {
                    chrom: chrom.clone(),
                    prev_end: pair[0].end,
                    next_start: pair[1].start,
                });
            }
        }

        let mut segments: Vec<CodingSegment> = specs
            .into_iter()
            .map(|s| CodingSegment {
                chrom: s.chrom,
                start: s.start,
                end: s.end,
                strand,
                is_coding: s.is_coding,
                coding_offset: 0,
            })
            .collect();

        // Assign cumulative coding offsets in transcript order.
        let mut offset = 0u64;
        let indices: Vec<usize> = match strand {
            Strand::Plus => (0..segments.len()).collect(),
            Strand::Minus => (0..segments.len()).rev().collect(),
        };
        for i in indices {
            if segments[i].is_coding {
                segments[i].coding_offset = offset;
                offset += segments[i].width();
            }
        }

        Ok(Self {
            transcript_id,
            strand,
            segments,
        })
    }

    /// Fixture-style constructor: all segments coding, one chromosome.
    ///
    /// Intervals are (start, end), 1-based inclusive, sorted ascending.
    pub fn from_coding_intervals(
        transcript_id: impl Into<String>,
        strand: Strand,
        chrom: &str,
        intervals: &[(u64, u64)],
    ) -> Result<Self, ExonModelError> {
        let specs = intervals
            .iter()
            .map(|&(start, end)| SegmentSpec::new(chrom, start, end, true))
            .collect();
        Self::new(transcript_id, strand, specs)
    }

    /// Transcript identifier
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Strand of the transcript
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Segments sorted by genomic position ascending
    pub fn segments(&self) -> &[CodingSegment] {
        &self.segments
    }

    /// Chromosome of the model
    pub fn chrom(&self) -> &str {
        &self.segments[0].chrom
    }

    /// Segments in 5′→3′ transcript order
    pub fn transcript_order(&self) -> Vec<&CodingSegment> {
        match self.strand {
            Strand::Plus => self.segments.iter().collect(),
            Strand::Minus => self.segments.iter().rev().collect(),
        }
    }

    /// Total coding length in nucleotides
    pub fn coding_len(&self) -> u64 {
        self.segments
            .iter()
            .filter(|s| s.is_coding)
            .map(|s| s.width())
            .sum()
    }

    /// Whether the coding length supports whole-codon translation
    pub fn has_valid_coding_length(&self) -> bool {
        let len = self.coding_len();
        len > 0 && len % 3 == 0
    }

    /// Number of codons in the coding sequence, when divisible by three
    pub fn codon_count(&self) -> Option<u64> {
        if self.has_valid_coding_length() {
            Some(self.coding_len() / 3)
        } else {
            None
        }
    }

    /// The UTR-trimmed view: coding segments only, offsets renormalized.
    ///
    /// Pure transform; the original model is untouched.
    pub fn coding_only(&self) -> ExonModel {
        let mut segments: Vec<CodingSegment> = self
            .segments
            .iter()
            .filter(|s| s.is_coding)
            .cloned()
            .collect();

        let mut offset = 0u64;
        let indices: Vec<usize> = match self.strand {
            Strand::Plus => (0..segments.len()).collect(),
            Strand::Minus => (0..segments.len()).rev().collect(),
        };
        for i in indices {
            segments[i].coding_offset = offset;
            offset += segments[i].width();
        }

        ExonModel {
            transcript_id: self.transcript_id.clone(),
            strand: self.strand,
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_roundtrip() {
        assert_eq!(Strand::from_char('+'), Some(Strand::Plus));
        assert_eq!(Strand::from_char('-'), Some(Strand::Minus));
        assert_eq!(Strand::from_char('.'), None);
        assert_eq!(Strand::from_sign(1), Some(Strand::Plus));
        assert_eq!(Strand::from_sign(-1), Some(Strand::Minus));
        assert_eq!(Strand::from_sign(0), None);
        assert_eq!(format!("{}", Strand::Minus), "-");
        assert_eq!(Strand::Plus.complement(), Strand::Minus);
    }

    #[test]
    fn test_plus_strand_offsets() {
        let model = ExonModel::from_coding_intervals(
            "TX1",
            Strand::Plus,
            "chr1",
            &[(100, 115), (200, 213)],
        )
        .unwrap();
        assert_eq!(model.coding_len(), 30);
        assert_eq!(model.segments()[0].coding_offset, 0);
        assert_eq!(model.segments()[1].coding_offset, 16);
        assert_eq!(model.codon_count(), Some(10));
    }

    #[test]
    fn test_minus_strand_offsets() {
        // On minus strand the rightmost segment is 5' first.
        let model = ExonModel::from_coding_intervals(
            "TX1",
            Strand::Minus,
            "chr1",
            &[(100, 115), (200, 213)],
        )
        .unwrap();
        assert_eq!(model.segments()[1].coding_offset, 0);
        assert_eq!(model.segments()[0].coding_offset, 14);

        let order: Vec<u64> = model.transcript_order().iter().map(|s| s.start).collect();
        assert_eq!(order, vec![200, 100]);
    }

    #[test]
    fn test_coding_only_filters_and_renormalizes() {
        let model = ExonModel::new(
            "TX1",
            Strand::Plus,
            vec![
                SegmentSpec::new("chr1", 50, 80, false), // 5' UTR
                SegmentSpec::new("chr1", 100, 115, true),
                SegmentSpec::new("chr1", 200, 213, true),
                SegmentSpec::new("chr1", 300, 320, false), // 3' UTR
            ],
        )
        .unwrap();

        assert_eq!(model.segments().len(), 4);
        assert_eq!(model.coding_len(), 30);

        let coding = model.coding_only();
        assert_eq!(coding.segments().len(), 2);
        assert_eq!(coding.segments()[0].coding_offset, 0);
        assert_eq!(coding.segments()[1].coding_offset, 16);
        assert_eq!(coding.coding_len(), 30);
    }

    #[test]
    fn test_invalid_models() {
        assert!(matches!(
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[]),
            Err(ExonModelError::Empty(_))
        ));
        assert!(matches!(
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(120, 100)]),
            Err(ExonModelError::InvertedSegment { .. })
        ));
        // A zero start would silently shift every mapped coordinate
        // (and underflow the BED writer's 0-based conversion).
        assert!(matches!(
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(0, 29)]),
            Err(ExonModelError::ZeroStart { .. })
        ));
        assert!(matches!(
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(100, 150), (140, 200)]),
            Err(ExonModelError::OverlappingSegments { .. })
        ));
        assert!(matches!(
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(100, 150), (150, 200)]),
            Err(ExonModelError::OverlappingSegments { .. })
        ));
        let specs = vec![
            SegmentSpec::new("chr1", 100, 150, true),
            SegmentSpec::new("chr2", 200, 250, true),
        ];
        assert!(matches!(
            ExonModel::new("TX", Strand::Plus, specs),
            Err(ExonModelError::MixedChromosomes { .. })
        ));
    }

    #[test]
    fn test_invalid_coding_length() {
        let model =
            ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(100, 115)]).unwrap();
        assert_eq!(model.coding_len(), 16);
        assert!(!model.has_valid_coding_length());
        assert_eq!(model.codon_count(), None);
    }
}
