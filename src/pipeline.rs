//! Orchestration of downloads and analyses.
//!
//! The analysis core (`fasta`, `codon`, `compare`, `report`) is pure; this
//! module is where files are read and written, records are downloaded and
//! the courtesy delay between two downloads is observed.
//!
//! Batch-style operations report failures per item and keep going.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::codon;
use crate::compare;
use crate::fasta::{parse_record_file, FastaError};
use crate::fetch::{EutilsClient, FetchError, SequenceSource, DEFAULT_BASE_URL};
use crate::model::Record;
use crate::report;
use crate::storage;

/// Pause between two consecutive downloads, per NCBI usage policy.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(6);

/// HTTP timeout for a single E-utilities request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur while running an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Format(#[from] FastaError),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FASTA file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Analysis cancelled")]
    Cancelled,
}

/// Result type for pipeline operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory for downloaded records and comparison reports
    pub output_dir: PathBuf,
    /// E-utilities base URL
    pub base_url: String,
    /// Wait between the two downloads of a full analysis
    pub settle_delay: Duration,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_url: DEFAULT_BASE_URL.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What [`Pipeline::download`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Record fetched and written
    Saved(PathBuf),
    /// A local copy already existed; nothing was requested
    Skipped(PathBuf),
}

/// Cancellation flag with a timed wait. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and wakes every waiter.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    /// Blocks for up to `timeout`.
    ///
    /// Returns `true` if the full time elapsed, `false` if the token was
    /// (or already had been) cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }
}

/// Per-step results of [`Pipeline::full_analysis`].
#[derive(Debug)]
pub struct FullReport {
    pub downloads: Vec<AnalysisResult<DownloadOutcome>>,
    pub comparison: AnalysisResult<PathBuf>,
    pub codon_reports: Vec<AnalysisResult<PathBuf>>,
}

impl FullReport {
    /// Number of steps that failed.
    pub fn failures(&self) -> usize {
        self.downloads.iter().filter(|r| r.is_err()).count()
            + usize::from(self.comparison.is_err())
            + self.codon_reports.iter().filter(|r| r.is_err()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.failures() == 0
    }
}

/// Drives downloads and analyses against a [`SequenceSource`].
pub struct Pipeline<S> {
    source: S,
    settings: Settings,
}

impl Pipeline<EutilsClient> {
    /// Creates a pipeline backed by the E-utilities endpoint in `settings`.
    pub fn from_settings(settings: Settings) -> AnalysisResult<Self> {
        let client = EutilsClient::new(settings.base_url.clone(), settings.timeout)?;
        Ok(Self::new(client, settings))
    }
}

impl<S: SequenceSource> Pipeline<S> {
    pub fn new(source: S, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// Local path the record for `organism` is stored at.
    pub fn fasta_path(&self, organism: &str) -> PathBuf {
        storage::fasta_path(&self.settings.output_dir, organism)
    }

    /// Downloads the record for `organism` unless a local copy exists.
    pub fn download(&self, organism: &str) -> AnalysisResult<DownloadOutcome> {
        let path = self.fasta_path(organism);
        if storage::exists(&path) {
            info!("{} already exists, skipping download", path.display());
            return Ok(DownloadOutcome::Skipped(path));
        }

        let body = self.source.fetch_by_organism(organism)?;
        storage::write_text(&path, &body)?;
        info!("Saved {}", path.display());
        Ok(DownloadOutcome::Saved(path))
    }

    /// Writes the codon report for a FASTA file next to it.
    pub fn analyze_codons<P: AsRef<Path>>(&self, input: P) -> AnalysisResult<PathBuf> {
        let input = input.as_ref();
        let record = load(input)?;
        let table = codon::count(&record.sequence);
        let text = report::codon_report(&table, &input.display().to_string());

        let output = storage::codon_report_path(input);
        storage::write_text(&output, &text)?;
        info!(
            "Codon analysis of {} ({} nt, {} codons, {} distinct) saved to {}",
            input.display(),
            record.sequence.len(),
            table.total(),
            table.len(),
            output.display()
        );
        Ok(output)
    }

    /// Compares two FASTA files and writes the report to the output directory.
    pub fn compare_files<A, B>(&self, a: A, b: B) -> AnalysisResult<PathBuf>
    where
        A: AsRef<Path>,
        B: AsRef<Path>,
    {
        let (a, b) = (a.as_ref(), b.as_ref());
        let record_a = load(a)?;
        let record_b = load(b)?;
        let comparison = compare::compare(&record_a.sequence, &record_b.sequence);
        let text = report::comparison_report(
            &comparison,
            &a.display().to_string(),
            &b.display().to_string(),
        );

        let output = storage::comparison_report_path(&self.settings.output_dir, a, b);
        storage::write_text(&output, &text)?;
        info!(
            "Comparison of {} and {} ({:.2}% similar) saved to {}",
            a.display(),
            b.display(),
            comparison.percent,
            output.display()
        );
        Ok(output)
    }

    /// Writes a codon report for every file, continuing past failures.
    pub fn analyze_batch<P: AsRef<Path>>(
        &self,
        inputs: &[P],
    ) -> Vec<(PathBuf, AnalysisResult<PathBuf>)> {
        inputs
            .iter()
            .map(|input| {
                let input = input.as_ref();
                let result = self.analyze_codons(input);
                if let Err(e) = &result {
                    warn!("Codon analysis of {} failed: {}", input.display(), e);
                }
                (input.to_path_buf(), result)
            })
            .collect()
    }

    /// Downloads two organisms, compares them and analyzes both.
    ///
    /// The settle delay is always observed between the two downloads.
    /// Cancelling `cancel` during that wait aborts the run with
    /// [`AnalysisError::Cancelled`]. Other failures are logged and
    /// recorded in the returned [`FullReport`].
    pub fn full_analysis(
        &self,
        first: &str,
        second: &str,
        cancel: &CancelToken,
    ) -> AnalysisResult<FullReport> {
        let mut downloads = Vec::with_capacity(2);
        downloads.push(self.logged_download(first));

        info!(
            "Waiting {:?} before the next download",
            self.settings.settle_delay
        );
        if !cancel.wait_timeout(self.settings.settle_delay) {
            warn!("Full analysis of {} and {} cancelled", first, second);
            return Err(AnalysisError::Cancelled);
        }

        downloads.push(self.logged_download(second));

        let (path_a, path_b) = (self.fasta_path(first), self.fasta_path(second));
        let comparison = self.compare_files(&path_a, &path_b);
        if let Err(e) = &comparison {
            warn!("Comparison of {} and {} failed: {}", first, second, e);
        }

        let codon_reports = self
            .analyze_batch(&[path_a, path_b])
            .into_iter()
            .map(|(_, result)| result)
            .collect();

        let report = FullReport {
            downloads,
            comparison,
            codon_reports,
        };
        info!(
            "Full analysis of {} and {} finished with {} failed step(s)",
            first,
            second,
            report.failures()
        );
        Ok(report)
    }

    fn logged_download(&self, organism: &str) -> AnalysisResult<DownloadOutcome> {
        let result = self.download(organism);
        if let Err(e) = &result {
            warn!("Download of {} failed: {}", organism, e);
        }
        result
    }
}

/// Parses the record in `path`, which must exist.
pub fn load(path: &Path) -> AnalysisResult<Record> {
    if !storage::exists(path) {
        return Err(AnalysisError::MissingInput(path.to_path_buf()));
    }
    Ok(parse_record_file(path)?)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::fetch::FetchResult;

    /// In-memory source keyed by organism name; records every request.
    #[derive(Default)]
    struct FakeSource {
        records: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with(records: &[(&str, &str)]) -> Self {
            Self {
                records: records
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl SequenceSource for FakeSource {
        fn search(&self, organism: &str) -> FetchResult<String> {
            self.requests.borrow_mut().push(organism.to_string());
            if self.records.contains_key(organism) {
                Ok(organism.to_string())
            } else {
                Err(FetchError::NoMatch(organism.to_string()))
            }
        }

        fn fetch(&self, id: &str) -> FetchResult<String> {
            Ok(self.records.get(id).cloned().unwrap_or_default())
        }
    }

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            output_dir: dir.to_path_buf(),
            settle_delay: Duration::ZERO,
            ..Settings::default()
        }
    }

    #[test]
    fn test_download_saves_record() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[("Anura", ">MockSequence\nATGCGTACGTAGCTAG\n")]);
        let pipeline = Pipeline::new(source, settings_in(dir.path()));

        let outcome = pipeline.download("Anura").unwrap();
        let expected = dir.path().join("Anura.fasta");
        assert_eq!(outcome, DownloadOutcome::Saved(expected.clone()));
        assert_eq!(
            storage::read_text(&expected).unwrap(),
            ">MockSequence\nATGCGTACGTAGCTAG\n"
        );
    }

    #[test]
    fn test_download_skips_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Anura.fasta");
        storage::write_text(&existing, ">Local\nAAAA\n").unwrap();

        let source = FakeSource::with(&[("Anura", ">Remote\nCCCC\n")]);
        let pipeline = Pipeline::new(source, settings_in(dir.path()));

        let outcome = pipeline.download("Anura").unwrap();
        assert_eq!(outcome, DownloadOutcome::Skipped(existing.clone()));
        assert!(pipeline.source.requests.borrow().is_empty());
        assert_eq!(storage::read_text(&existing).unwrap(), ">Local\nAAAA\n");
    }

    #[test]
    fn test_download_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let err = pipeline.download("Nonexistent").unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch(FetchError::NoMatch(_))));
        assert!(!storage::exists(dir.path().join("Nonexistent.fasta")));
    }

    #[test]
    fn test_download_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[("Empty", "")]);
        let pipeline = Pipeline::new(source, settings_in(dir.path()));

        let err = pipeline.download("Empty").unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch(FetchError::EmptyBody(_))));
    }

    #[test]
    fn test_analyze_codons_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.fasta");
        storage::write_text(
            &input,
            ">test_sequence\nATGCGATAGCTAGCTAACGCGTAGCTAGCTAGGCTAATG",
        )
        .unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let output = pipeline.analyze_codons(&input).unwrap();
        assert_eq!(output, dir.path().join("test_codon_analysis.txt"));

        let text = storage::read_text(&output).unwrap();
        assert!(text.starts_with("Codon frequency analysis for "));
        assert!(text.lines().next().unwrap().ends_with("test.fasta:"));
        assert!(text.contains("ATG    2          Met"));
        assert!(text.contains("TAG    2          Stop"));
    }

    #[test]
    fn test_analyze_codons_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let err = pipeline
            .analyze_codons(dir.path().join("absent.fasta"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput(_)));
    }

    #[test]
    fn test_analyze_codons_invalid_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.fasta");
        storage::write_text(&input, "ATGCGT\n").unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let err = pipeline.analyze_codons(&input).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Format(FastaError::MissingHeader { line: 1 })
        ));
        assert!(!storage::exists(dir.path().join("bad_codon_analysis.txt")));
    }

    #[test]
    fn test_compare_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("test1.fasta");
        let b = dir.path().join("test2.fasta");
        storage::write_text(&a, ">Seq1\nATGCGTACGTA").unwrap();
        storage::write_text(&b, ">Seq2\nATGCATACGTA").unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let output = pipeline.compare_files(&a, &b).unwrap();
        assert_eq!(
            output,
            dir.path().join("comparison_test1.fasta_vs_test2.fasta.txt")
        );

        let text = storage::read_text(&output).unwrap();
        assert!(text.contains("Similarity: 90.91%"));
        assert!(text.contains("Identical characters: 10"));
        assert!(text.ends_with("Seq1: ATGC-TACGTA\nSeq2: ATGC-TACGTA"));
    }

    #[test]
    fn test_analyze_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.fasta");
        let bad = dir.path().join("bad.fasta");
        let absent = dir.path().join("absent.fasta");
        storage::write_text(&good, ">ok\nATGAAA").unwrap();
        storage::write_text(&bad, "no header").unwrap();
        let pipeline = Pipeline::new(FakeSource::default(), settings_in(dir.path()));

        let results = pipeline.analyze_batch(&[&bad, &absent, &good]);
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_err());
        assert!(matches!(results[1].1, Err(AnalysisError::MissingInput(_))));
        assert!(results[2].1.is_ok());
        assert!(storage::exists(dir.path().join("good_codon_analysis.txt")));
    }

    #[test]
    fn test_full_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[
            ("Anura", ">frog\nATGCGTACGTA\n"),
            ("Homo sapiens", ">human\nATGCATACGTA\n"),
        ]);
        let pipeline = Pipeline::new(source, settings_in(dir.path()));

        let report = pipeline
            .full_analysis("Anura", "Homo sapiens", &CancelToken::new())
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(
            *pipeline.source.requests.borrow(),
            vec!["Anura".to_string(), "Homo sapiens".to_string()]
        );
        assert!(storage::exists(
            dir.path()
                .join("comparison_Anura.fasta_vs_Homo sapiens.fasta.txt")
        ));
        assert!(storage::exists(dir.path().join("Anura_codon_analysis.txt")));
        assert!(storage::exists(
            dir.path().join("Homo sapiens_codon_analysis.txt")
        ));
    }

    #[test]
    fn test_full_analysis_reports_failed_download() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[("Anura", ">frog\nATGCGTACGTA\n")]);
        let pipeline = Pipeline::new(source, settings_in(dir.path()));

        let report = pipeline
            .full_analysis("Anura", "Unknown", &CancelToken::new())
            .unwrap();
        assert!(report.downloads[0].is_ok());
        assert!(report.downloads[1].is_err());
        assert!(matches!(report.comparison, Err(AnalysisError::MissingInput(_))));
        assert!(report.codon_reports[0].is_ok());
        assert!(report.codon_reports[1].is_err());
        assert_eq!(report.failures(), 3);
    }

    #[test]
    fn test_full_analysis_cancelled_during_wait() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::with(&[
            ("Anura", ">frog\nATGC\n"),
            ("Homo sapiens", ">human\nATGC\n"),
        ]);
        let settings = Settings {
            settle_delay: Duration::from_secs(3600),
            ..settings_in(dir.path())
        };
        let pipeline = Pipeline::new(source, settings);

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = pipeline
            .full_analysis("Anura", "Homo sapiens", &cancel)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
        assert_eq!(*pipeline.source.requests.borrow(), vec!["Anura".to_string()]);
    }

    #[test]
    fn test_cancel_token_wait_elapses() {
        let token = CancelToken::new();
        assert!(token.wait_timeout(Duration::from_millis(10)));
        assert!(token.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn test_cancel_token_wakes_waiter() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let start = Instant::now();
        assert!(!token.wait_timeout(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(!token.wait_timeout(Duration::ZERO));
        handle.join().unwrap();
    }

    #[test]
    fn test_full_analysis_waits_after_skipped_download() {
        let dir = tempfile::tempdir().unwrap();
        storage::write_text(dir.path().join("Anura.fasta"), ">frog\nATGCGTACGTA\n").unwrap();
        let source = FakeSource::with(&[("Homo sapiens", ">human\nATGCATACGTA\n")]);
        let delay = Duration::from_millis(200);
        let settings = Settings {
            settle_delay: delay,
            ..settings_in(dir.path())
        };
        let pipeline = Pipeline::new(source, settings);

        let start = Instant::now();
        let report = pipeline
            .full_analysis("Anura", "Homo sapiens", &CancelToken::new())
            .unwrap();
        assert!(start.elapsed() >= delay);
        assert!(matches!(report.downloads[0], Ok(DownloadOutcome::Skipped(_))));
        assert!(matches!(report.downloads[1], Ok(DownloadOutcome::Saved(_))));
        assert!(report.is_complete());
        assert_eq!(
            *pipeline.source.requests.borrow(),
            vec!["Homo sapiens".to_string()]
        );
    }
}
