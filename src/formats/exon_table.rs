//! TSV-backed annotation source
//!
//! Loads a flat exon-annotation table into memory and serves it
//! through the [`AnnotationSource`] trait. Expected columns, tab
//! separated, one segment per line:
//!
//! ```text
//! transcript_id  chrom  start  end  strand  coding  [protein_id]  [gene_name]  [uniprot_id]
//! ```
//!
//! `strand` is `+`/`-`, `coding` is `1`/`0`, optional identifier
//! columns use `.` for absent. Coordinates are 1-based inclusive.

use crate::core::{
    AnnotationError, AnnotationFilter, AnnotationResult, AnnotationSource, CrossReference, IdKind,
    MappingQuality, PepMapError, Result, SegmentSpec, Strand, TranscriptAnnotation,
};
use crate::formats::fasta::open_reader;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

/// In-memory annotation table
pub struct TableAnnotationSource {
    version: String,
    transcripts: HashMap<String, TranscriptAnnotation>,
    by_protein: HashMap<String, Vec<String>>,
    by_gene: HashMap<String, Vec<String>>,
    by_uniprot: HashMap<String, Vec<String>>,
}

impl TableAnnotationSource {
    /// Load the table from a (possibly gzipped) TSV file
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reader = open_reader(&path)?;
        Self::from_reader(reader, &path.display().to_string())
    }

    /// Load the table from any buffered reader; `origin` feeds the
    /// version string used for cache keying
    pub fn from_reader<R: BufRead>(reader: R, origin: &str) -> Result<Self> {
        let mut transcripts: HashMap<String, TranscriptAnnotation> = HashMap::new();
        let mut by_protein: HashMap<String, Vec<String>> = HashMap::new();
        let mut by_gene: HashMap<String, Vec<String>> = HashMap::new();
        let mut by_uniprot: HashMap<String, Vec<String>> = HashMap::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if lineno == 0 && trimmed.to_lowercase().starts_with("transcript_id") {
                continue;
            }
            let row = parse_row(trimmed, lineno + 1)?;

            let entry = transcripts
                .entry(row.transcript_id.clone())
                .or_insert_with(|| TranscriptAnnotation {
                    transcript_id: row.transcript_id.clone(),
                    gene_name: None,
                    strand: row.strand,
                    segments: Vec::new(),
                    xrefs: Vec::new(),
                });
            if entry.strand != row.strand {
                return Err(invalid(
                    lineno + 1,
                    format!(
                        "strand '{}' disagrees with earlier rows of {}",
                        row.strand, row.transcript_id
                    ),
                ));
            }
            entry
                .segments
                .push(SegmentSpec::new(row.chrom, row.start, row.end, row.is_coding));

            if let Some(gene) = row.gene_name {
                entry.gene_name.get_or_insert_with(|| gene.clone());
                index_id(&mut by_gene, gene, &row.transcript_id);
            }
            if let Some(protein_id) = row.protein_id {
                add_xref(entry, &protein_id, IdKind::ProteinId, MappingQuality::Direct);
                index_id(&mut by_protein, protein_id, &row.transcript_id);
            }
            if let Some(uniprot_id) = row.uniprot_id {
                add_xref(entry, &uniprot_id, IdKind::UniprotId, MappingQuality::Indirect);
                index_id(&mut by_uniprot, uniprot_id, &row.transcript_id);
            }
        }

        Ok(Self {
            version: format!("table:{}", origin),
            transcripts,
            by_protein,
            by_gene,
            by_uniprot,
        })
    }

    /// Number of distinct transcripts in the table
    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }

    fn candidates_for(&self, id: &str, kind: IdKind) -> Vec<&TranscriptAnnotation> {
        let tx_ids: Vec<&String> = match kind {
            IdKind::TranscriptId => {
                return self.transcripts.get(id).into_iter().collect();
            }
            IdKind::ProteinId => self.by_protein.get(id).into_iter().flatten().collect(),
            IdKind::UniprotId => self.by_uniprot.get(id).into_iter().flatten().collect(),
            IdKind::GeneName => self.by_gene.get(id).into_iter().flatten().collect(),
        };
        tx_ids
            .into_iter()
            .filter_map(|tx| self.transcripts.get(tx))
            .collect()
    }
}

impl AnnotationSource for TableAnnotationSource {
    fn fetch(
        &self,
        ids: &[String],
        kind: IdKind,
        filter: Option<&AnnotationFilter>,
        _timeout: Option<Duration>,
    ) -> AnnotationResult<HashMap<String, Vec<TranscriptAnnotation>>> {
        let mut out = HashMap::new();
        for id in ids {
            let candidates: Vec<TranscriptAnnotation> = self
                .candidates_for(id, kind)
                .into_iter()
                .filter(|tx| filter.map_or(true, |f| f.matches(tx)))
                .cloned()
                .collect();
            // Absent identifiers stay out of the map: "no match" is a
            // partial result, not an error.
            if !candidates.is_empty() {
                out.insert(id.clone(), candidates);
            }
        }
        Ok(out)
    }

    fn version(&self) -> String {
        self.version.clone()
    }
}

struct Row {
    transcript_id: String,
    chrom: String,
    start: u64,
    end: u64,
    strand: Strand,
    is_coding: bool,
    protein_id: Option<String>,
    gene_name: Option<String>,
    uniprot_id: Option<String>,
}

fn optional(fields: &[&str], idx: usize) -> Option<String> {
    fields
        .get(idx)
        .copied()
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
}

fn parse_row(line: &str, lineno: usize) -> Result<Row> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 6 {
        return Err(invalid(lineno, format!("expected at least 6 fields, found {}", fields.len())));
    }
    let start: u64 = fields[2]
        .parse()
        .map_err(|_| invalid(lineno, format!("invalid start '{}'", fields[2])))?;
    let end: u64 = fields[3]
        .parse()
        .map_err(|_| invalid(lineno, format!("invalid end '{}'", fields[3])))?;
    let strand = fields[4]
        .chars()
        .next()
        .and_then(Strand::from_char)
        .ok_or_else(|| invalid(lineno, format!("invalid strand '{}'", fields[4])))?;
    let is_coding = match fields[5] {
        "1" => true,
        "0" => false,
        other => return Err(invalid(lineno, format!("invalid coding flag '{}'", other))),
    };

    Ok(Row {
        transcript_id: fields[0].to_string(),
        chrom: fields[1].to_string(),
        start,
        end,
        strand,
        is_coding,
        protein_id: optional(&fields, 6),
        gene_name: optional(&fields, 7),
        uniprot_id: optional(&fields, 8),
    })
}

fn invalid(lineno: usize, message: String) -> PepMapError {
    PepMapError::Annotation(AnnotationError::Query(format!(
        "line {}: {}",
        lineno, message
    )))
}

fn index_id(index: &mut HashMap<String, Vec<String>>, key: String, transcript_id: &str) {
    let entry = index.entry(key).or_default();
    if !entry.iter().any(|tx| tx == transcript_id) {
        entry.push(transcript_id.to_string());
    }
}

fn add_xref(entry: &mut TranscriptAnnotation, id: &str, kind: IdKind, quality: MappingQuality) {
    if !entry.xrefs.iter().any(|x| x.id == id && x.kind == kind) {
        entry.xrefs.push(CrossReference {
            id: id.to_string(),
            kind,
            quality,
        });
    }
}
