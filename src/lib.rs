//! # Industry Papers
//!
//! Searches PubMed for a query, fetches each hit and keeps the papers that
//! have at least one author affiliated with a company rather than a
//! university, college, institute or hospital.
//!
//! ## Architecture
//!
//! - [`sources`]: the [`sources::Transport`] seam and the PubMed E-utilities client
//! - [`affiliation`]: the academic/industry keyword rule
//! - [`pipeline`]: search → per-record detail fetch → filter
//! - [`models`]: [`PaperRecord`] and the transient [`models::AuthorEntry`]
//! - [`output`]: CSV, JSON and console table encodings
//! - [`api`]: `GET /fetch_papers/` HTTP adapter
//! - [`utils`]: HTTP client and XML helpers
//! - [`config`]: Configuration management

pub mod affiliation;
pub mod api;
pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::PaperRecord;
pub use pipeline::PaperFetcher;
pub use sources::{PubMedSource, SourceError, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
