//! Codon frequency counting.
//!
//! A sequence is read in frame +1 as non-overlapping triplets starting at
//! position 0. A trailing remainder of one or two symbols is dropped.

use std::collections::BTreeMap;

use crate::model::Sequence;

/// Occurrence counts per distinct codon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodonTable {
    counts: BTreeMap<String, usize>,
}

impl CodonTable {
    /// Returns the count for `codon`, 0 if it never occurred.
    pub fn get(&self, codon: &str) -> usize {
        self.counts.get(codon).copied().unwrap_or(0)
    }

    /// Number of distinct codons.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of codons counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterates over entries in codon order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(codon, &n)| (codon.as_str(), n))
    }

    /// Entries by descending count; equal counts keep codon order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        // Stable sort over codon-ordered input gives the lexicographic tie-break
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Counts the codons of `sequence`.
pub fn count(sequence: &Sequence) -> CodonTable {
    count_str(sequence.as_str())
}

/// Counts the codons of a raw string, taken as given (no case folding).
pub fn count_str(sequence: &str) -> CodonTable {
    let symbols: Vec<char> = sequence.chars().collect();
    let mut counts = BTreeMap::new();
    for codon in symbols.chunks_exact(3) {
        *counts.entry(codon.iter().collect::<String>()).or_insert(0) += 1;
    }
    CodonTable { counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ATGCGATAGCTAGCTAACGCGTAGCTAGCTAGGCTAATG";

    #[test]
    fn test_count_sample() {
        let table = count(&Sequence::new(SAMPLE));
        assert_eq!(table.total(), 13);
        assert_eq!(table.get("ATG"), 2);
        assert_eq!(table.get("CGA"), 1);
        assert_eq!(table.get("TAG"), 2);
        assert_eq!(table.get("CTA"), 3);
        assert_eq!(table.get("TAA"), 0);
    }

    #[test]
    fn test_remainder_dropped() {
        for (seq, expected) in [("", 0), ("A", 0), ("AT", 0), ("ATG", 1), ("ATGC", 1), ("ATGCA", 1), ("ATGCAT", 2)] {
            let table = count_str(seq);
            assert_eq!(table.total(), seq.len() / 3, "sequence {:?}", seq);
            assert_eq!(table.total(), expected);
        }
        assert_eq!(count_str("ATGCA").get("CA"), 0);
    }

    #[test]
    fn test_total_matches_length_over_three() {
        let mut seq = String::new();
        for i in 0..50 {
            seq.push(['A', 'C', 'G', 'T', 'N'][i * 7 % 5]);
            assert_eq!(count_str(&seq).total(), seq.len() / 3);
        }
    }

    #[test]
    fn test_non_nucleotide_codons_are_counted() {
        let table = count_str("NNNATGXY-");
        assert_eq!(table.get("NNN"), 1);
        assert_eq!(table.get("XY-"), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_multibyte_symbol_does_not_split() {
        let table = count_str("AéGTTT");
        assert_eq!(table.get("AéG"), 1);
        assert_eq!(table.get("TTT"), 1);
    }

    #[test]
    fn test_ranked_order_and_tie_break() {
        let table = count(&Sequence::new(SAMPLE));
        let ranked = table.ranked();
        let codons: Vec<&str> = ranked.iter().map(|(c, _)| *c).collect();
        assert_eq!(codons, vec!["CTA", "ATG", "GCT", "TAG", "AAC", "AGG", "CGA", "GCG"]);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(count_str(SAMPLE), count_str(SAMPLE));
    }
}
