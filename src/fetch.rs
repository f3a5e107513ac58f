//! Remote record retrieval from NCBI E-utilities.
//!
//! Retrieval is two requests: `esearch` resolves an organism name to the
//! identifier of its best nucleotide match, then `efetch` downloads that
//! entry as FASTA text. Nothing is retried.

use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use reqwest::blocking::Client;
use thiserror::Error;

/// Public E-utilities endpoint.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Id>(\d+)</Id>").expect("valid id pattern"));

/// Errors that can occur while retrieving a record.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No nucleotide record found for organism '{0}'")]
    NoMatch(String),

    #[error("Empty FASTA body returned for id {0}")]
    EmptyBody(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// A remote service that can look up and return FASTA records.
pub trait SequenceSource {
    /// Resolves an organism name to a single record identifier.
    fn search(&self, organism: &str) -> FetchResult<String>;

    /// Downloads the FASTA text of a record.
    fn fetch(&self, id: &str) -> FetchResult<String>;

    /// Searches, then fetches the best match. Blank bodies are errors.
    fn fetch_by_organism(&self, organism: &str) -> FetchResult<String> {
        let id = self.search(organism)?;
        let body = self.fetch(&id)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody(id));
        }
        Ok(body)
    }
}

/// Blocking E-utilities client.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
}

impl EutilsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codonkit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> FetchResult<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(query).send()?;
        debug!("GET {} -> {}", response.url(), response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.text()?)
    }
}

impl SequenceSource for EutilsClient {
    fn search(&self, organism: &str) -> FetchResult<String> {
        let term = format!("{}[Organism]", organism);
        let xml = self.get_text(
            "esearch.fcgi",
            &[
                ("db", "nucleotide"),
                ("term", term.as_str()),
                ("retmax", "1"),
                ("usehistory", "y"),
            ],
        )?;
        extract_id(&xml).ok_or_else(|| FetchError::NoMatch(organism.to_string()))
    }

    fn fetch(&self, id: &str) -> FetchResult<String> {
        self.get_text(
            "efetch.fcgi",
            &[
                ("db", "nucleotide"),
                ("id", id),
                ("rettype", "fasta"),
                ("retmode", "text"),
            ],
        )
    }
}

/// Returns the first numeric `<Id>` in an esearch response.
pub fn extract_id(xml: &str) -> Option<String> {
    ID_PATTERN.captures(xml).map(|caps| caps[1].to_string())
}
