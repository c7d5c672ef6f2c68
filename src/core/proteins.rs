//! Protein collection and batch mapping orchestration
//!
//! A [`ProteinsCollection`] binds protein sequences, their metadata,
//! and attached peptide evidence, and drives batched mapping: one
//! annotation query for the whole batch, transcript selection per
//! protein, then coordinate mapping. The batch call always returns one
//! result per input protein in input order; individual failures are
//! recorded, counted, and logged, never escalated.

use crate::core::annotation::{
    AnnotationFilter, AnnotationSource, ExonModelCache, IdKind, TranscriptAnnotation,
};
use crate::core::error::{FailureKind, LoadError, PepMapError, Result};
use crate::core::exon::ExonModel;
use crate::core::mapper::{CoordinateMapper, ProteinMapping};
use crate::core::protein::{PeptideRange, Protein};
use crate::core::select::TranscriptSelector;
use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

/// One peptide-spectrum match as delivered by an identification source
#[derive(Debug, Clone, PartialEq)]
pub struct PsmRecord {
    pub accession: String,
    pub peptide: String,
    /// Start residue (1-based, inclusive)
    pub start: usize,
    /// End residue (1-based, inclusive)
    pub end: usize,
    pub score: Option<f64>,
    pub spectrum_ref: Option<String>,
    pub charge: Option<u8>,
}

/// External source of protein sequences (FASTA-like)
pub trait SequenceSource {
    /// Load accession/sequence pairs in input order
    fn load_sequences(&self) -> Result<Vec<(String, String)>>;
}

/// External source of search-engine identifications
pub trait IdentificationSource {
    /// Load PSM records in input order
    fn load_psms(&self) -> Result<Vec<PsmRecord>>;
}

/// Options controlling one batch mapping run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Filter forwarded to the annotation source
    pub filter: Option<AnnotationFilter>,
    /// Per-query timeout forwarded to the annotation source;
    /// identifiers unresolved within it count as not found
    pub query_timeout: Option<Duration>,
    /// Map proteins in parallel after the (sequential) annotation and
    /// selection phase
    pub parallel: bool,
}

/// Result for one input protein
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinResult {
    pub accession: String,
    /// Chosen transcript, when resolution and selection succeeded
    pub transcript_id: Option<String>,
    pub mapping: std::result::Result<ProteinMapping, FailureKind>,
}

/// Aggregate counts over one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    /// Proteins with a successful protein-level mapping
    pub mapped: usize,
    /// Identifier not found or no candidates
    pub resolution_failures: usize,
    /// No candidate with a valid coding length, or invalid annotation
    pub selection_failures: usize,
    /// Protein-level length mismatches
    pub mapping_failures: usize,
    /// Failed peptide groups inside otherwise mapped proteins
    pub peptide_failures: usize,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} proteins: {} mapped, {} unresolved, {} without usable transcript, {} length mismatches, {} failed peptide groups",
            self.total,
            self.mapped,
            self.resolution_failures,
            self.selection_failures,
            self.mapping_failures,
            self.peptide_failures
        )
    }
}

/// Output of a batch mapping run: one result per input protein plus
/// the failure-count summary
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<ProteinResult>,
    pub summary: BatchSummary,
}

/// Per-protein work item prepared by the sequential phase
struct Prepared {
    accession: String,
    outcome: std::result::Result<ExonModel, FailureKind>,
}

/// The aggregate entity binding proteins and their peptide evidence
#[derive(Debug, Default)]
pub struct ProteinsCollection {
    proteins: Vec<Protein>,
    by_accession: HashMap<String, usize>,
}

impl ProteinsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a sequence source, then attach peptide
    /// evidence from an identification source. Per-record load errors
    /// are collected and returned; they never abort the load.
    pub fn from_sources(
        sequences: &dyn SequenceSource,
        identifications: &dyn IdentificationSource,
    ) -> Result<(Self, Vec<LoadError>)> {
        let mut collection = Self::new();
        for (accession, sequence) in sequences.load_sequences()? {
            collection.push(Protein::new(accession, sequence));
        }
        let records = identifications.load_psms()?;
        let errors = collection.attach_psms(records);
        Ok((collection, errors))
    }

    /// Add a protein; a duplicate accession replaces the earlier entry
    pub fn push(&mut self, protein: Protein) {
        let accession = protein.accession().to_string();
        match self.by_accession.get(&accession) {
            Some(&idx) => self.proteins[idx] = protein,
            None => {
                self.by_accession.insert(accession, self.proteins.len());
                self.proteins.push(protein);
            }
        }
    }

    pub fn get(&self, accession: &str) -> Option<&Protein> {
        self.by_accession.get(accession).map(|&i| &self.proteins[i])
    }

    pub fn get_mut(&mut self, accession: &str) -> Option<&mut Protein> {
        self.by_accession
            .get(accession)
            .map(|&i| &mut self.proteins[i])
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protein> {
        self.proteins.iter()
    }

    /// Attach PSM records to their proteins.
    ///
    /// Each record is validated against its protein (bounds and exact
    /// substring match); failures are collected per record and the
    /// remaining records still load.
    pub fn attach_psms(&mut self, records: Vec<PsmRecord>) -> Vec<LoadError> {
        let mut errors = Vec::new();
        for record in records {
            let Some(&idx) = self.by_accession.get(&record.accession) else {
                errors.push(LoadError::UnknownProtein(record.accession));
                continue;
            };
            let protein = &self.proteins[idx];
            let built = PeptideRange::new(protein, record.start, record.end, &record.peptide);
            match built {
                Ok(mut range) => {
                    if let Some(score) = record.score {
                        range = range.with_score(score);
                    }
                    if let Some(spectrum) = record.spectrum_ref {
                        range = range.with_spectrum_ref(spectrum);
                    }
                    if let Some(charge) = record.charge {
                        range = range.with_charge(charge);
                    }
                    self.proteins[idx].add_peptide(range);
                }
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            warn!("{} identification records failed to load", errors.len());
        }
        errors
    }

    /// Map every protein in the collection onto the genome.
    ///
    /// Resolution uses one batched annotation query for all
    /// accessions. Exactly one [`ProteinResult`] is produced per input
    /// protein, in input order; any per-protein failure is recorded in
    /// its result and the batch always completes. Only a source-level
    /// query error aborts the call.
    pub fn map_all(
        &self,
        kind: IdKind,
        source: &dyn AnnotationSource,
        options: &BatchOptions,
    ) -> Result<BatchOutcome> {
        let ids: Vec<String> = self
            .proteins
            .iter()
            .map(|p| p.accession().to_string())
            .collect();
        let resolved = source.fetch(&ids, kind, options.filter.as_ref(), options.query_timeout)?;
        let version = source.version();

        // Sequential phase: resolve, select, and build models, sharing
        // one per-call cache across duplicate transcripts.
        let mut cache = ExonModelCache::new();
        let selector = TranscriptSelector::new();
        let prepared: Vec<Prepared> = self
            .proteins
            .iter()
            .map(|protein| Prepared {
                accession: protein.accession().to_string(),
                outcome: self.prepare_protein(protein, &resolved, &selector, &mut cache, &version),
            })
            .collect();

        // Mapping phase: pure per-protein computation.
        let results: Vec<ProteinResult> = if options.parallel {
            self.proteins
                .par_iter()
                .zip(prepared.par_iter())
                .map(|(protein, prep)| Self::map_prepared(protein, prep))
                .collect()
        } else {
            self.proteins
                .iter()
                .zip(prepared.iter())
                .map(|(protein, prep)| Self::map_prepared(protein, prep))
                .collect()
        };

        let summary = summarize(&results);
        info!("batch mapping finished: {}", summary);
        Ok(BatchOutcome { results, summary })
    }

    /// Resolve one protein to a validated exon model
    fn prepare_protein(
        &self,
        protein: &Protein,
        resolved: &HashMap<String, Vec<TranscriptAnnotation>>,
        selector: &TranscriptSelector,
        cache: &mut ExonModelCache,
        version: &str,
    ) -> std::result::Result<ExonModel, FailureKind> {
        let accession = protein.accession();
        let Some(annotations) = resolved.get(accession) else {
            warn!("{}: identifier not found in annotation source", accession);
            return Err(FailureKind::IdentifierNotFound);
        };
        if annotations.is_empty() {
            warn!("{}: no transcript candidates", accession);
            return Err(FailureKind::NoCandidates);
        }

        let mut candidates = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            if let Some(model) = cache.get(&annotation.transcript_id, version) {
                candidates.push(model.clone());
                continue;
            }
            match annotation.exon_model() {
                Ok(model) => {
                    cache.insert(version, model.clone());
                    candidates.push(model);
                }
                Err(e) => {
                    // Defective annotation is rejected loudly for this
                    // fetch; other candidates may still serve.
                    warn!("{}: rejected transcript {}: {}", accession, annotation.transcript_id, e);
                }
            }
        }
        if candidates.is_empty() {
            return Err(FailureKind::InvalidAnnotation {
                message: format!("all {} candidate annotations invalid", annotations.len()),
            });
        }

        match selector.select(protein.len(), &candidates) {
            Some(model) => Ok(model.clone()),
            None => {
                warn!("{}: no candidate with a valid coding length", accession);
                Err(FailureKind::SelectionFailed)
            }
        }
    }

    fn map_prepared(protein: &Protein, prep: &Prepared) -> ProteinResult {
        match &prep.outcome {
            Ok(model) => {
                let mapper = CoordinateMapper::new(model);
                ProteinResult {
                    accession: prep.accession.clone(),
                    transcript_id: Some(model.transcript_id().to_string()),
                    mapping: mapper.map(protein),
                }
            }
            Err(kind) => ProteinResult {
                accession: prep.accession.clone(),
                transcript_id: None,
                mapping: Err(kind.clone()),
            },
        }
    }
}

fn summarize(results: &[ProteinResult]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: results.len(),
        ..BatchSummary::default()
    };
    for result in results {
        match &result.mapping {
            Ok(mapping) => {
                summary.mapped += 1;
                summary.peptide_failures += mapping.failed_count();
            }
            Err(FailureKind::IdentifierNotFound) | Err(FailureKind::NoCandidates) => {
                summary.resolution_failures += 1;
            }
            Err(FailureKind::SelectionFailed) | Err(FailureKind::InvalidAnnotation { .. }) => {
                summary.selection_failures += 1;
            }
            Err(_) => summary.mapping_failures += 1,
        }
    }
    summary
}
