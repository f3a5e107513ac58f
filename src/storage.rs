//! Local files: existence checks, raw text I/O and report naming.
//!
//! Report paths are derived only from input paths, so re-running an
//! analysis overwrites the previous report instead of adding a new one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FASTA_EXTENSION: &str = ".fasta";
const CODON_REPORT_SUFFIX: &str = "_codon_analysis.txt";

/// Returns true if something exists at `path`.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

pub fn read_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Writes `content` to `path`, replacing any existing file.
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    fs::write(path, content)
}

/// Local FASTA path for an organism: `<dir>/<organism>.fasta`.
pub fn fasta_path<P: AsRef<Path>>(dir: P, organism: &str) -> PathBuf {
    dir.as_ref().join(format!("{}{}", organism, FASTA_EXTENSION))
}

/// Codon report path next to `input`.
///
/// `x.fasta` becomes `x_codon_analysis.txt`; any other name has its
/// extension dropped before the suffix is added.
pub fn codon_report_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let name = file_name(input);
    let stem = match name.strip_suffix(FASTA_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    };
    input.with_file_name(format!("{}{}", stem, CODON_REPORT_SUFFIX))
}

/// Comparison report path in `dir`: `comparison_<a>_vs_<b>.txt`.
pub fn comparison_report_path<D, A, B>(dir: D, a: A, b: B) -> PathBuf
where
    D: AsRef<Path>,
    A: AsRef<Path>,
    B: AsRef<Path>,
{
    dir.as_ref().join(format!(
        "comparison_{}_vs_{}.txt",
        file_name(a.as_ref()),
        file_name(b.as_ref())
    ))
}

/// File name component as a display string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
