//! Plain-text reports.
//!
//! ## Codon report
//!
//! ```text
//! Codon frequency analysis for Homo sapiens.fasta:
//! Codon  Frequency  Amino acid
//! ---------------------------------------
//! CTA    3          Leu
//! ATG    2          Met
//! ```
//!
//! Rows are sorted by descending frequency, ties by codon. Columns are
//! left-aligned and padded to 6, 10 and 10 characters.
//!
//! ## Comparison report
//!
//! ```text
//! Comparison between a.fasta and b.fasta:
//! Similarity: 90.91%
//! Identical characters: 10
//!
//! Matching positions:
//! Seq1: ATGC-TACGTA
//! Seq2: ATGC-TACGTA
//! ```

use crate::codon::CodonTable;
use crate::compare::Comparison;
use crate::genetic_code::translate;

const RULE: &str = "---------------------------------------";

/// Renders a codon frequency table for the record named `label`.
pub fn codon_report(table: &CodonTable, label: &str) -> String {
    let mut out = format!("Codon frequency analysis for {}:\n", label);
    out.push_str(&row("Codon", "Frequency", "Amino acid"));
    out.push_str(RULE);
    out.push('\n');

    for (codon, frequency) in table.ranked() {
        out.push_str(&row(codon, &frequency.to_string(), translate(codon)));
    }

    out
}

fn row(codon: &str, frequency: &str, amino_acid: &str) -> String {
    format!("{:<6} {:<10} {:<10}\n", codon, frequency, amino_acid)
}

/// Renders the two masked lines of a comparison.
pub fn alignment_view(comparison: &Comparison) -> String {
    format!("Seq1: {}\nSeq2: {}", comparison.masked_a, comparison.masked_b)
}

/// Renders the comparison of the records named `label_a` and `label_b`.
pub fn comparison_report(comparison: &Comparison, label_a: &str, label_b: &str) -> String {
    format!(
        "Comparison between {} and {}:\nSimilarity: {:.2}%\nIdentical characters: {}\n\nMatching positions:\n{}",
        label_a,
        label_b,
        comparison.percent,
        comparison.identical,
        alignment_view(comparison)
    )
}
