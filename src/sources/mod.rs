//! PubMed access behind a pluggable transport.
//!
//! This module defines the [`Transport`] trait, the single `GET` verb the
//! search and detail stages need from the network. [`crate::utils::HttpClient`]
//! implements it on top of `reqwest`; [`MockTransport`] serves canned
//! E-utilities responses for tests.
//!
//! [`PubMedSource`] implements the two-stage fetch protocol:
//!
//! 1. **Search** (`esearch.fcgi`): query text in, up to `retmax` PMIDs out.
//!    A non-success status is fatal ([`SourceError::SearchFailure`]).
//! 2. **Detail** (`efetch.fcgi`): one PMID in, one classified
//!    [`crate::models::PaperRecord`] out. A non-success status only skips
//!    that record ([`SourceError::DetailFetchFailure`]).

pub mod mock;
mod pubmed;

pub use mock::MockTransport;
pub use pubmed::{
    PubMedSource, DEFAULT_MAX_RESULTS, PUBMED_EFETCH_URL, PUBMED_ESEARCH_URL,
};

use async_trait::async_trait;

/// Status code and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The transport boundary: issue a GET with query parameters and hand back
/// the status and body text.
///
/// Implementations report only transport-level failures (connection refused,
/// timeouts, undecodable bodies) as errors. HTTP error statuses are returned
/// as a normal [`HttpResponse`] so callers can decide how fatal they are.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn get(&self, url: &str, params: &[(&str, String)])
        -> Result<HttpResponse, SourceError>;
}

/// Errors that can occur when talking to PubMed
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The search endpoint answered with a non-success status
    #[error("PubMed search failed with status {status}")]
    SearchFailure { status: u16 },

    /// The detail endpoint answered with a non-success status for one record
    #[error("PubMed fetch for {id} failed with status {status}")]
    DetailFetchFailure { id: String, status: u16 },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// XML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
