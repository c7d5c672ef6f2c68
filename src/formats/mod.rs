//! File format adapters
//!
//! Thin file-backed implementations of the core's collaborator traits
//! (protein FASTA, PSM tables, exon-annotation tables) plus BED12
//! output. The core never depends on this layer.

pub mod bed;
pub mod exon_table;
pub mod fasta;
pub mod psm;

pub use bed::{peptide_to_bed12, write_bed12};
pub use exon_table::TableAnnotationSource;
pub use fasta::{parse_fasta, FastaSource};
pub use psm::{parse_psm_line, PsmTableSource};
