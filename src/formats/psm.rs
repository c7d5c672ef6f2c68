//! Peptide-spectrum match TSV reader
//!
//! File-backed [`IdentificationSource`]. Expected columns, tab
//! separated: accession, peptide, start, end, then optional score,
//! spectrum reference, and charge. Lines starting with `#` and a
//! leading `accession` header row are skipped. Malformed lines are
//! logged and skipped; the substring-vs-protein check happens later,
//! when records are attached to their proteins.

use crate::core::{IdentificationSource, LoadError, PsmRecord, Result};
use crate::formats::fasta::open_reader;
use log::warn;
use std::io::BufRead;
use std::path::PathBuf;

/// TSV-backed identification source
pub struct PsmTableSource {
    path: PathBuf,
}

impl PsmTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentificationSource for PsmTableSource {
    fn load_psms(&self) -> Result<Vec<PsmRecord>> {
        let reader = open_reader(&self.path)?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if lineno == 0 && trimmed.to_lowercase().starts_with("accession") {
                continue;
            }
            match parse_psm_line(trimmed, lineno + 1) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("skipping PSM record: {}", e);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("skipped {} malformed PSM lines", skipped);
        }
        Ok(records)
    }
}

/// Parse one PSM line (1-based line number for error reporting)
pub fn parse_psm_line(line: &str, lineno: usize) -> std::result::Result<PsmRecord, LoadError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 4 {
        return Err(LoadError::InvalidRecord {
            line: lineno,
            message: format!("expected at least 4 fields, found {}", fields.len()),
        });
    }
    let parse_pos = |name: &str, value: &str| {
        value.parse::<usize>().map_err(|_| LoadError::InvalidRecord {
            line: lineno,
            message: format!("invalid {} '{}'", name, value),
        })
    };
    let start = parse_pos("start", fields[2])?;
    let end = parse_pos("end", fields[3])?;

    let score = match fields.get(4).copied().filter(|s| !s.is_empty() && *s != ".") {
        Some(s) => Some(s.parse::<f64>().map_err(|_| LoadError::InvalidRecord {
            line: lineno,
            message: format!("invalid score '{}'", s),
        })?),
        None => None,
    };
    let spectrum_ref = fields
        .get(5)
        .copied()
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string());
    let charge = match fields.get(6).copied().filter(|s| !s.is_empty() && *s != ".") {
        Some(s) => Some(s.parse::<u8>().map_err(|_| LoadError::InvalidRecord {
            line: lineno,
            message: format!("invalid charge '{}'", s),
        })?),
        None => None,
    };

    Ok(PsmRecord {
        accession: fields[0].to_string(),
        peptide: fields[1].to_string(),
        start,
        end,
        score,
        spectrum_ref,
        charge,
    })
}
