//! BED12 output for mapped peptides
//!
//! One BED12 line per successfully mapped peptide group; block
//! structure encodes junction-spanning peptides. Core coordinates are
//! 1-based inclusive and converted to BED's 0-based half-open
//! convention here, at the boundary.

use crate::core::{BatchOutcome, GenomicRange, PeptideMapping};
use std::io::{self, Write};

/// Render one mapped peptide group as a BED12 line.
///
/// Returns `None` for failed groups. Blocks are sorted by genomic
/// start as BED requires, independent of 5′→3′ emission order.
pub fn peptide_to_bed12(accession: &str, mapping: &PeptideMapping) -> Option<String> {
    let ranges = mapping.result.as_ref().ok()?;
    if ranges.is_empty() {
        return None;
    }

    let mut blocks: Vec<&GenomicRange> = ranges.iter().collect();
    blocks.sort_unstable_by_key(|r| r.start);

    let chrom = &blocks[0].chrom;
    let chrom_start = blocks[0].start - 1; // to 0-based
    let chrom_end = blocks[blocks.len() - 1].end;
    let strand = blocks[0].strand;

    let block_sizes: Vec<String> = blocks.iter().map(|r| r.width().to_string()).collect();
    let block_starts: Vec<String> = blocks
        .iter()
        .map(|r| (r.start - 1 - chrom_start).to_string())
        .collect();

    Some(format!(
        "{}\t{}\t{}\t{}:{}-{}\t0\t{}\t{}\t{}\t0\t{}\t{}\t{}",
        chrom,
        chrom_start,
        chrom_end,
        accession,
        mapping.start,
        mapping.end,
        strand,
        chrom_start,
        chrom_end,
        blocks.len(),
        block_sizes.join(","),
        block_starts.join(","),
    ))
}

/// Write every successfully mapped peptide group of a batch as BED12.
///
/// Returns the number of lines written.
pub fn write_bed12<W: Write>(writer: &mut W, outcome: &BatchOutcome) -> io::Result<usize> {
    let mut written = 0usize;
    for result in &outcome.results {
        let Ok(mapping) = &result.mapping else {
            continue;
        };
        for peptide in &mapping.peptides {
            if let Some(line) = peptide_to_bed12(&result.accession, peptide) {
                writeln!(writer, "{}", line)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FailureKind, Strand};

    fn range(start: u64, end: u64, ordinal: usize) -> GenomicRange {
        GenomicRange {
            chrom: "chr1".to_string(),
            start,
            end,
            strand: Strand::Plus,
            ordinal,
        }
    }

    #[test]
    fn test_single_block() {
        let mapping = PeptideMapping {
            group: 0,
            start: 3,
            end: 5,
            result: Ok(vec![range(106, 114, 0)]),
        };
        let line = peptide_to_bed12("P1", &mapping).unwrap();
        assert_eq!(line, "chr1\t105\t114\tP1:3-5\t0\t+\t105\t114\t0\t1\t9\t0");
    }

    #[test]
    fn test_junction_blocks() {
        let mapping = PeptideMapping {
            group: 1,
            start: 5,
            end: 7,
            result: Ok(vec![range(112, 115, 0), range(200, 204, 1)]),
        };
        let line = peptide_to_bed12("P1", &mapping).unwrap();
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[1], "111");
        assert_eq!(fields[2], "204");
        assert_eq!(fields[9], "2");
        assert_eq!(fields[10], "4,5");
        assert_eq!(fields[11], "0,88");
    }

    #[test]
    fn test_minus_strand_blocks_sorted_by_genomic_start() {
        // 5'→3' emission order on minus strand is descending genomic;
        // BED blocks must still ascend.
        let mapping = PeptideMapping {
            group: 0,
            start: 4,
            end: 6,
            result: Ok(vec![
                GenomicRange {
                    chrom: "chr1".to_string(),
                    start: 200,
                    end: 204,
                    strand: Strand::Minus,
                    ordinal: 0,
                },
                GenomicRange {
                    chrom: "chr1".to_string(),
                    start: 112,
                    end: 115,
                    strand: Strand::Minus,
                    ordinal: 1,
                },
            ]),
        };
        let line = peptide_to_bed12("P1", &mapping).unwrap();
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[1], "111");
        assert_eq!(fields[2], "204");
        assert_eq!(fields[5], "-");
        assert_eq!(fields[10], "4,5");
        assert_eq!(fields[11], "0,88");
    }

    #[test]
    fn test_failed_group_is_skipped() {
        let mapping = PeptideMapping {
            group: 0,
            start: 3,
            end: 5,
            result: Err(FailureKind::OutOfCodingRegion { start: 3, end: 5 }),
        };
        assert!(peptide_to_bed12("P1", &mapping).is_none());
    }
}
