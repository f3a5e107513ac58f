//! # codonkit - Codon Usage and Sequence Comparison
//!
//! Retrieves nucleotide records from NCBI and runs two analyses on them:
//! codon frequency tables with their standard-code translation, and a
//! position-by-position comparison of two sequences.
//!
//! ## Architecture
//!
//! - `model`: Sequence and record value types
//! - `fasta`: Single-record FASTA parsing and validation
//! - `genetic_code`: Standard genetic code lookup
//! - `codon`: Codon frequency counting
//! - `compare`: Positional identity and masked alignment
//! - `report`: Plain-text report rendering
//! - `storage`: Local files and report naming
//! - `fetch`: NCBI E-utilities search-then-fetch
//! - `pipeline`: Orchestration of downloads and analyses
//!
//! Everything up to `report` is pure and works on in-memory values.

pub mod codon;
pub mod compare;
pub mod fasta;
pub mod fetch;
pub mod genetic_code;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod storage;
