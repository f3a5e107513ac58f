//! Standard genetic code and codon translation.
//!
//! The table is built once, on first use, from the NCBI `ncbieaa` string
//! for translation table 1. Every codon over `T`, `C`, `A`, `G` maps to one
//! of twenty amino acids or to [`AminoAcid::Stop`]; anything else
//! translates to [`UNKNOWN`].

use std::collections::HashMap;
use std::sync::LazyLock;

/// Symbol returned by [`translate`] for codons outside the 64 canonical ones.
pub const UNKNOWN: &str = "???";

/// Amino acids of NCBI table 1 (Standard), in `TCAG` codon order.
const STANDARD_NCBIEAA: &str =
    "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Nucleotide order used by NCBI: TTT, TTC, TTA, TTG, TCT, ...
static NCBI_BASES: [u8; 4] = [b'T', b'C', b'A', b'G'];

static STANDARD_CODE: LazyLock<HashMap<[u8; 3], AminoAcid>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(64);
    let mut residues = STANDARD_NCBIEAA.chars();
    for &b1 in &NCBI_BASES {
        for &b2 in &NCBI_BASES {
            for &b3 in &NCBI_BASES {
                if let Some(aa) = residues.next().and_then(AminoAcid::from_one_letter) {
                    table.insert([b1, b2, b3], aa);
                }
            }
        }
    }
    table
});

/// The twenty standard amino acids plus the stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

impl AminoAcid {
    /// Parses an IUPAC one-letter code (`*` for stop).
    pub fn from_one_letter(c: char) -> Option<Self> {
        let aa = match c {
            'A' => Self::Ala,
            'R' => Self::Arg,
            'N' => Self::Asn,
            'D' => Self::Asp,
            'C' => Self::Cys,
            'Q' => Self::Gln,
            'E' => Self::Glu,
            'G' => Self::Gly,
            'H' => Self::His,
            'I' => Self::Ile,
            'L' => Self::Leu,
            'K' => Self::Lys,
            'M' => Self::Met,
            'F' => Self::Phe,
            'P' => Self::Pro,
            'S' => Self::Ser,
            'T' => Self::Thr,
            'W' => Self::Trp,
            'Y' => Self::Tyr,
            'V' => Self::Val,
            '*' => Self::Stop,
            _ => return None,
        };
        Some(aa)
    }

    /// Three-letter abbreviation, `"Stop"` for the stop signal.
    pub fn three_letter(self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Stop => "Stop",
        }
    }
}

/// Looks up a codon in the standard code.
///
/// Returns `None` unless `codon` is exactly three of the uppercase symbols
/// `A`, `C`, `G`, `T`.
pub fn lookup(codon: &str) -> Option<AminoAcid> {
    let key: [u8; 3] = codon.as_bytes().try_into().ok()?;
    STANDARD_CODE.get(&key).copied()
}

/// Translates a codon to its three-letter amino acid symbol.
///
/// Total over all inputs: non-canonical codons yield [`UNKNOWN`].
pub fn translate(codon: &str) -> &'static str {
    lookup(codon).map_or(UNKNOWN, AminoAcid::three_letter)
}

/// Iterates over the 64 canonical codons in NCBI order.
pub fn canonical_codons() -> impl Iterator<Item = String> {
    NCBI_BASES.iter().flat_map(|&b1| {
        NCBI_BASES.iter().flat_map(move |&b2| {
            NCBI_BASES
                .iter()
                .map(move |&b3| String::from_utf8_lossy(&[b1, b2, b3]).into_owned())
        })
    })
}
