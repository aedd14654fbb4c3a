//! Search → detail → filter orchestration for one query.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::config::Config;
use crate::models::PaperRecord;
use crate::sources::{PubMedSource, SourceError, Transport};
use crate::utils::HttpClient;

/// Runs the two-stage PubMed fetch and keeps papers with industry authors.
#[derive(Debug, Clone)]
pub struct PaperFetcher {
    source: PubMedSource,
    concurrency: usize,
}

impl PaperFetcher {
    /// Fetch detail records strictly one after another
    pub fn new(source: PubMedSource) -> Self {
        Self {
            source,
            concurrency: 1,
        }
    }

    /// Build a fetcher with a reqwest transport configured from `config`
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::from_config(&config.http)?);
        let source = PubMedSource::with_config(transport, config.eutils.clone());
        Ok(Self::new(source).concurrency(config.fetch.concurrency))
    }

    /// Allow up to `n` detail requests in flight. Output order is unaffected.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn source(&self) -> &PubMedSource {
        &self.source
    }

    /// Search for `query`, fetch every hit and return the papers that have at
    /// least one non-academic author, in search order.
    ///
    /// Only a failed search is an error. Records whose detail fetch fails
    /// are skipped, and duplicate PMIDs yield duplicate records.
    pub async fn fetch_and_filter(&self, query: &str) -> Result<Vec<PaperRecord>, SourceError> {
        let ids = self.source.search(query).await?;
        let total = ids.len();
        let source = &self.source;

        let fetched: Vec<Option<PaperRecord>> = stream::iter(ids)
            .map(|id| async move { source.fetch_and_classify(&id).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let papers: Vec<PaperRecord> = fetched
            .into_iter()
            .flatten()
            .filter(PaperRecord::has_non_academic_authors)
            .collect();

        tracing::info!(
            "Kept {} of {} PubMed records with non-academic authors",
            papers.len(),
            total
        );
        Ok(papers)
    }
}
