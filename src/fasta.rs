//! FASTA record parser.
//!
//! Reads a single record: a header line starting with `>` followed by any
//! number of sequence lines, which are trimmed and joined in order.
//!
//! ## FASTA Format
//!
//! ```text
//! >NC_012920.1 Homo sapiens mitochondrion, complete genome
//! GATCACAGGTCTATCACCCTATTAACCACTCACGGGAGCTCTCCATGCAT
//! GGTATTTTCGTCTGGGGGGTATGCACGCGATAGCATTGCGAGACGCTGGA
//! ```
//!
//! Sequence data is normalized to uppercase. The header marker must be the
//! first character of its line. Later header lines are skipped, so the
//! sequence lines of every entry are joined under the first label.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::model::{Record, Sequence};

/// Errors that can occur during record parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read record: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty FASTA input")]
    EmptyInput,

    #[error("Invalid FASTA format: line {line} does not start with '>'")]
    MissingHeader { line: usize },
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses the record in a FASTA file.
///
/// # Examples
///
/// ```no_run
/// use codonkit::fasta::parse_record_file;
///
/// let record = parse_record_file("Homo sapiens.fasta").unwrap();
/// println!("{}: {} nt", record.label, record.sequence.len());
/// ```
pub fn parse_record_file<P: AsRef<Path>>(path: P) -> FastaResult<Record> {
    let file = File::open(path)?;
    parse_record(BufReader::new(file))
}

/// Parses a record from a reader.
pub fn parse_record<R: BufRead>(reader: R) -> FastaResult<Record> {
    let mut label: Option<String> = None;
    let mut data = String::new();
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;

        match label {
            None => {
                // Leading blank lines are tolerated
                if line.trim().is_empty() {
                    continue;
                }
                let header = line
                    .strip_prefix('>')
                    .ok_or(FastaError::MissingHeader { line: line_number })?;
                label = Some(header.trim().to_string());
            }
            Some(_) => {
                if !line.starts_with('>') {
                    data.push_str(line.trim());
                }
            }
        }
    }

    let label = label.ok_or(FastaError::EmptyInput)?;
    Ok(Record::new(label, Sequence::new(data)))
}

/// Parses a record from a string.
pub fn parse_record_str(content: &str) -> FastaResult<Record> {
    parse_record(content.as_bytes())
}
