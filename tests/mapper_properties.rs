//! Property-based tests for the coordinate mapper
//!
//! Random exon models and peptide ranges, checking coverage
//! conservation, junction contiguity, and strand symmetry.

use pepmap::core::{residue_span_to_nt, CoordinateMapper, ExonModel, PeptideRange, Protein, Strand};
use proptest::prelude::*;

/// Build a plus- or minus-strand model from segment widths and the
/// gaps between them, starting at genomic position 1000.
fn build_model(widths: &[u64], gaps: &[u64], strand: Strand) -> ExonModel {
    let mut intervals = Vec::with_capacity(widths.len());
    let mut g = 1000u64;
    for (i, &w) in widths.iter().enumerate() {
        intervals.push((g, g + w - 1));
        g += w + gaps[i % gaps.len()];
    }
    ExonModel::from_coding_intervals("TX", strand, "chr1", &intervals).unwrap()
}

/// Mirror coordinates around a fixed point, flipping the strand. The
/// mirrored model encodes the same transcript read in the opposite
/// genomic direction.
fn mirror_model(model: &ExonModel) -> ExonModel {
    const M: u64 = 10_000_000;
    let mut intervals: Vec<(u64, u64)> = model
        .segments()
        .iter()
        .map(|s| (M - s.end, M - s.start))
        .collect();
    intervals.sort_unstable();
    ExonModel::from_coding_intervals(
        model.transcript_id(),
        model.strand().complement(),
        "chr1",
        &intervals,
    )
    .unwrap()
}

/// Protein of `len` alanines with one peptide attached at [s, e]
fn protein_with_range(len: usize, s: usize, e: usize) -> Protein {
    let mut p = Protein::new("P1", "A".repeat(len));
    let observed = "A".repeat(e - s + 1);
    let r = PeptideRange::new(&p, s, e, &observed).unwrap();
    p.add_peptide(r);
    p
}

/// Coding-space offset of a genomic position within a model
fn coding_offset_of(model: &ExonModel, pos: u64) -> u64 {
    for seg in model.coding_only().transcript_order() {
        if pos >= seg.start && pos <= seg.end {
            return match seg.strand {
                Strand::Plus => seg.coding_offset + (pos - seg.start),
                Strand::Minus => seg.coding_offset + (seg.end - pos),
            };
        }
    }
    panic!("position {} not in any coding segment", pos);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sum of genomic widths equals 3x the residue count, on both
    /// strands, for any segmentation.
    #[test]
    fn prop_coverage_conservation(
        mut widths in prop::collection::vec(1u64..40, 1..6),
        gaps in prop::collection::vec(1u64..100, 1..6),
        minus in any::<bool>(),
        seed_s in 0usize..10_000,
        seed_len in 0usize..10_000,
    ) {
        // Pad the total to a whole number of codons.
        let total: u64 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += (3 - total % 3) % 3;
        }
        let total: u64 = widths.iter().sum();
        let protein_len = (total / 3) as usize;

        let strand = if minus { Strand::Minus } else { Strand::Plus };
        let model = build_model(&widths, &gaps, strand);

        let s = 1 + seed_s % protein_len;
        let e = s + seed_len % (protein_len - s + 1);
        let protein = protein_with_range(protein_len, s, e);

        let mapping = CoordinateMapper::new(&model).map(&protein).unwrap();
        let ranges = mapping.peptides[0].result.as_ref().unwrap();

        let covered: u64 = ranges.iter().map(|r| r.width()).sum();
        prop_assert_eq!(covered, 3 * (e - s + 1) as u64);

        // Ordinals are dense and sequential.
        for (i, r) in ranges.iter().enumerate() {
            prop_assert_eq!(r.ordinal, i);
        }
    }

    /// Emitted ranges, read in order, tile the coding-space interval
    /// contiguously; junction-spanning peptides reconstruct exactly.
    #[test]
    fn prop_junction_contiguity(
        mut widths in prop::collection::vec(1u64..25, 2..6),
        gaps in prop::collection::vec(1u64..100, 1..6),
        minus in any::<bool>(),
        seed_s in 0usize..10_000,
        seed_len in 0usize..10_000,
    ) {
        let total: u64 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += (3 - total % 3) % 3;
        }
        let total: u64 = widths.iter().sum();
        let protein_len = (total / 3) as usize;

        let strand = if minus { Strand::Minus } else { Strand::Plus };
        let model = build_model(&widths, &gaps, strand);

        let s = 1 + seed_s % protein_len;
        let e = s + seed_len % (protein_len - s + 1);
        let protein = protein_with_range(protein_len, s, e);

        let mapping = CoordinateMapper::new(&model).map(&protein).unwrap();
        let ranges = mapping.peptides[0].result.as_ref().unwrap();

        let (nt_start, nt_end) = residue_span_to_nt(s, e);
        let mut expected_next = nt_start;
        for r in ranges.iter() {
            // The 5' end of the emitted range depends on strand.
            let five_prime = match r.strand {
                Strand::Plus => r.start,
                Strand::Minus => r.end,
            };
            let offset = coding_offset_of(&model, five_prime);
            prop_assert_eq!(offset, expected_next);
            expected_next += r.width();
        }
        prop_assert_eq!(expected_next, nt_end + 1);
    }

    /// Mirroring the model across strands preserves widths per emitted
    /// position and mirrors genomic coordinates exactly.
    #[test]
    fn prop_strand_symmetry(
        mut widths in prop::collection::vec(1u64..25, 1..6),
        gaps in prop::collection::vec(1u64..100, 1..6),
        seed_s in 0usize..10_000,
        seed_len in 0usize..10_000,
    ) {
        const M: u64 = 10_000_000;
        let total: u64 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += (3 - total % 3) % 3;
        }
        let total: u64 = widths.iter().sum();
        let protein_len = (total / 3) as usize;

        let plus_model = build_model(&widths, &gaps, Strand::Plus);
        let minus_model = mirror_model(&plus_model);

        let s = 1 + seed_s % protein_len;
        let e = s + seed_len % (protein_len - s + 1);
        let protein = protein_with_range(protein_len, s, e);

        let plus = CoordinateMapper::new(&plus_model).map(&protein).unwrap();
        let minus = CoordinateMapper::new(&minus_model).map(&protein).unwrap();
        let plus_ranges = plus.peptides[0].result.as_ref().unwrap();
        let minus_ranges = minus.peptides[0].result.as_ref().unwrap();

        prop_assert_eq!(plus_ranges.len(), minus_ranges.len());
        for (p, m) in plus_ranges.iter().zip(minus_ranges.iter()) {
            prop_assert_eq!(p.width(), m.width());
            prop_assert_eq!(m.start, M - p.end);
            prop_assert_eq!(m.end, M - p.start);
            prop_assert_eq!(m.strand, Strand::Minus);
        }

        // In raw genomic order the 5'→3' walk is reversed.
        if plus_ranges.len() > 1 {
            prop_assert!(plus_ranges.windows(2).all(|w| w[0].start < w[1].start));
            prop_assert!(minus_ranges.windows(2).all(|w| w[0].start > w[1].start));
        }
    }

    /// Mapping the full protein touches every coding segment once.
    #[test]
    fn prop_full_protein_tiles_model(
        mut widths in prop::collection::vec(1u64..25, 1..6),
        gaps in prop::collection::vec(1u64..100, 1..6),
        minus in any::<bool>(),
    ) {
        let total: u64 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += (3 - total % 3) % 3;
        }
        let total: u64 = widths.iter().sum();
        let protein_len = (total / 3) as usize;

        let strand = if minus { Strand::Minus } else { Strand::Plus };
        let model = build_model(&widths, &gaps, strand);
        let protein = protein_with_range(protein_len, 1, protein_len);

        let mapping = CoordinateMapper::new(&model).map(&protein).unwrap();
        let ranges = mapping.peptides[0].result.as_ref().unwrap();
        prop_assert_eq!(ranges.len(), widths.len());
        let covered: u64 = ranges.iter().map(|r| r.width()).sum();
        prop_assert_eq!(covered, total);
    }
}

#[test]
fn concrete_two_segment_scenario() {
    // Protein length 10; segments [100,115] (16 nt) and [200,213]
    // (14 nt) on the plus strand.
    let model =
        ExonModel::from_coding_intervals("TX", Strand::Plus, "chr1", &[(100, 115), (200, 213)])
            .unwrap();
    let mapper = CoordinateMapper::new(&model);

    let mut protein = Protein::new("P1", "MKTAYIAKQR");
    for (s, e) in [(3usize, 5usize), (5, 7)] {
        let observed = protein.sequence()[s - 1..e].to_string();
        let r = PeptideRange::new(&protein, s, e, &observed).unwrap();
        protein.add_peptide(r);
    }

    let mapping = mapper.map(&protein).unwrap();

    // [3,5] → nt 6..14 → entirely within the first segment.
    let first = mapping.peptides[0].result.as_ref().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!((first[0].start, first[0].end), (106, 114));

    // [5,7] → nt 12..20 → straddles the junction.
    let second = mapping.peptides[1].result.as_ref().unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!((second[0].start, second[0].end), (112, 115));
    assert_eq!((second[1].start, second[1].end), (200, 204));
}
