//! Position-by-position sequence comparison.
//!
//! Only the first `min(len a, len b)` positions are compared. The
//! similarity percentage divides by the length of the *longer* sequence,
//! so any overhang counts against it.

use crate::model::Sequence;

/// Placeholder written at mismatched positions of the masked view.
pub const MISMATCH: char = '-';

/// Outcome of comparing two sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Positions with the same symbol in both sequences
    pub identical: usize,
    /// `identical / max(len a, len b) * 100`, 0 when both are empty
    pub percent: f64,
    /// First sequence over the compared window, mismatches masked
    pub masked_a: String,
    /// Second sequence over the compared window, mismatches masked
    pub masked_b: String,
}

/// Compares two sequences.
pub fn compare(a: &Sequence, b: &Sequence) -> Comparison {
    compare_str(a.as_str(), b.as_str())
}

/// Compares two raw strings symbol by symbol.
pub fn compare_str(a: &str, b: &str) -> Comparison {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let min_len = a.len().min(b.len());

    let mut identical = 0;
    let mut masked = String::with_capacity(min_len);
    for (&x, &y) in a.iter().zip(b.iter()) {
        if x == y {
            identical += 1;
            masked.push(x);
        } else {
            masked.push(MISMATCH);
        }
    }

    let longest = a.len().max(b.len());
    let percent = if longest == 0 {
        0.0
    } else {
        identical as f64 / longest as f64 * 100.0
    };

    Comparison {
        identical,
        percent,
        masked_a: masked.clone(),
        masked_b: masked,
    }
}
