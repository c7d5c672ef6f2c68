//! Protein FASTA reader
//!
//! File-backed [`SequenceSource`]: accession is the first word of the
//! header line, sequence lines are concatenated. Gzipped input is
//! detected by extension.

use crate::core::{PepMapError, Result, SequenceSource};
use flate2::read::GzDecoder;
use memchr::memchr2;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Open a possibly-gzipped file as a buffered reader
pub(crate) fn open_reader(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// FASTA-backed sequence source
pub struct FastaSource {
    path: PathBuf,
}

impl FastaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SequenceSource for FastaSource {
    fn load_sequences(&self) -> Result<Vec<(String, String)>> {
        let reader = open_reader(&self.path)?;
        parse_fasta(reader)
    }
}

/// Parse FASTA records from any buffered reader.
///
/// # Examples
/// ```
/// use pepmap::fasta::parse_fasta;
///
/// let input = b">P1 some description\nMKTA\nYIAK\n>P2\nPEPTIDE\n" as &[u8];
/// let records = parse_fasta(input).unwrap();
/// assert_eq!(records, vec![
///     ("P1".to_string(), "MKTAYIAK".to_string()),
///     ("P2".to_string(), "PEPTIDE".to_string()),
/// ]);
/// ```
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut records: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            let bytes = header.as_bytes();
            let accession = match memchr2(b' ', b'\t', bytes) {
                Some(pos) => &header[..pos],
                None => header,
            };
            if accession.is_empty() {
                return Err(PepMapError::Load(crate::core::LoadError::InvalidRecord {
                    line: lineno + 1,
                    message: "empty FASTA header".to_string(),
                }));
            }
            current = Some((accession.to_string(), String::new()));
        } else {
            match current.as_mut() {
                Some((_, seq)) => seq.push_str(trimmed.trim()),
                None => {
                    return Err(PepMapError::Load(crate::core::LoadError::InvalidRecord {
                        line: lineno + 1,
                        message: "sequence data before first header".to_string(),
                    }));
                }
            }
        }
    }
    if let Some(record) = current.take() {
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic() {
        let input = b">P1 desc here\nMKTA\nYIAK\n>P2\nPEP\n" as &[u8];
        let records = parse_fasta(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ("P1".to_string(), "MKTAYIAK".to_string()));
        assert_eq!(records[1], ("P2".to_string(), "PEP".to_string()));
    }

    #[test]
    fn test_parse_blank_lines_and_crlf() {
        let input = b">P1\r\nMKTA\r\n\r\nYIAK\r\n" as &[u8];
        let records = parse_fasta(input).unwrap();
        assert_eq!(records[0].1, "MKTAYIAK");
    }

    #[test]
    fn test_parse_sequence_before_header_fails() {
        let input = b"MKTA\n>P1\nYIAK\n" as &[u8];
        assert!(parse_fasta(input).is_err());
    }

    #[test]
    fn test_parse_empty_header_fails() {
        let input = b">\nMKTA\n" as &[u8];
        assert!(parse_fasta(input).is_err());
    }

    #[test]
    fn test_fasta_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">P1 protein one\nMKTAYIAKQR\n").unwrap();
        let source = FastaSource::new(file.path());
        let records = source.load_sequences().unwrap();
        assert_eq!(records, vec![("P1".to_string(), "MKTAYIAKQR".to_string())]);
    }

    #[test]
    fn test_fasta_source_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proteins.fasta.gz");
        let file = File::create(&path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(b">P9\nPEPTIDE\n").unwrap();
        enc.finish().unwrap();

        let source = FastaSource::new(&path);
        let records = source.load_sequences().unwrap();
        assert_eq!(records, vec![("P9".to_string(), "PEPTIDE".to_string())]);
    }
}
