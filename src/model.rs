//! Data model for parsed records.
//!
//! A [`Record`] is one FASTA entry: the free-text label from its header
//! line and the [`Sequence`] built from the lines that follow it.

/// An uppercase run of residue symbols.
///
/// Built by the record parser and never modified afterwards. Symbols
/// outside `A`, `C`, `G`, `T` are kept as-is; lookups downstream map them
/// to the unknown sentinel instead of rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    data: String,
}

impl Sequence {
    /// Creates a sequence, normalizing to uppercase.
    pub fn new(data: impl AsRef<str>) -> Self {
        Self {
            data: data.as_ref().to_uppercase(),
        }
    }

    /// Returns the number of symbols (characters, not bytes).
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }
}

/// A header label plus its sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Header text after the `>` marker, trimmed
    pub label: String,
    pub sequence: Sequence,
}

impl Record {
    pub fn new(label: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            label: label.into(),
            sequence,
        }
    }
}
