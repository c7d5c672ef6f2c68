//! Nucleotide sequence utilities
//!
//! Complement, reverse complement, and standard genetic code
//! translation used by the verification pass.

/// Complement a single DNA base
///
/// Supports the standard bases plus N; other characters are returned
/// unchanged.
#[inline]
pub fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'a' => b't',
        b't' => b'a',
        b'g' => b'c',
        b'c' => b'g',
        b'N' => b'N',
        b'n' => b'n',
        _ => base,
    }
}

/// Compute the reverse complement of a DNA sequence
///
/// # Examples
/// ```
/// use pepmap::core::dna::revcomp;
///
/// assert_eq!(revcomp("AACGT"), "ACGTT");
/// assert_eq!(revcomp("ATGC"), "GCAT");
/// assert_eq!(revcomp(""), "");
/// ```
pub fn revcomp(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(complement_base)
        .map(|b| b as char)
        .collect()
}

/// Translate one codon to its amino acid (standard genetic code)
///
/// Returns `b'*'` for a stop codon and `b'X'` for anything that is not
/// an unambiguous standard codon.
///
/// # Examples
/// ```
/// use pepmap::core::dna::translate_codon;
///
/// assert_eq!(translate_codon(b"ATG"), b'M');
/// assert_eq!(translate_codon(b"TAA"), b'*');
/// assert_eq!(translate_codon(b"NNN"), b'X');
/// ```
pub fn translate_codon(codon: &[u8]) -> u8 {
    if codon.len() != 3 {
        return b'X';
    }
    let upper = [
        codon[0].to_ascii_uppercase(),
        codon[1].to_ascii_uppercase(),
        codon[2].to_ascii_uppercase(),
    ];
    match &upper {
        b"TTT" | b"TTC" => b'F',
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => b'L',
        b"ATT" | b"ATC" | b"ATA" => b'I',
        b"ATG" => b'M',
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => b'V',
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => b'S',
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => b'P',
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => b'T',
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => b'A',
        b"TAT" | b"TAC" => b'Y',
        b"TAA" | b"TAG" | b"TGA" => b'*',
        b"CAT" | b"CAC" => b'H',
        b"CAA" | b"CAG" => b'Q',
        b"AAT" | b"AAC" => b'N',
        b"AAA" | b"AAG" => b'K',
        b"GAT" | b"GAC" => b'D',
        b"GAA" | b"GAG" => b'E',
        b"TGT" | b"TGC" => b'C',
        b"TGG" => b'W',
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => b'R',
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => b'G',
        _ => b'X',
    }
}

/// Translate a coding nucleotide sequence to amino acids.
///
/// Translation stops at the first stop codon, which is not emitted as a
/// residue. A trailing partial codon is ignored.
///
/// # Examples
/// ```
/// use pepmap::core::dna::translate;
///
/// assert_eq!(translate("ATGAAATAA"), "MK");
/// assert_eq!(translate("ATGAAA"), "MK");
/// assert_eq!(translate("ATGAA"), "M");
/// ```
pub fn translate(seq: &str) -> String {
    let bytes = seq.as_bytes();
    let mut out = String::with_capacity(bytes.len() / 3);
    for codon in bytes.chunks_exact(3) {
        let aa = translate_codon(codon);
        if aa == b'*' {
            break;
        }
        out.push(aa as char);
    }
    out
}
