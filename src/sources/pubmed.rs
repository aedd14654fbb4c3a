//! PubMed E-utilities client: `esearch` for PMIDs, `efetch` for details.

use std::sync::Arc;

use crate::config::EutilsConfig;
use crate::models::{AuthorEntry, PaperRecord};
use crate::sources::{SourceError, Transport};
use crate::utils::{Element, HttpClient};

/// PubMed E-utilities API base URLs
pub const PUBMED_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
pub const PUBMED_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Number of PMIDs requested per search
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// PubMed research source
///
/// Uses NCBI E-utilities for searching and fetching PubMed records. All
/// network access goes through the injected [`Transport`].
#[derive(Debug, Clone)]
pub struct PubMedSource {
    transport: Arc<dyn Transport>,
    config: EutilsConfig,
}

impl PubMedSource {
    /// Create a PubMed source talking to the public E-utilities endpoints
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_transport(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom transport (for testing)
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, EutilsConfig::default())
    }

    /// Create with a custom transport and endpoint configuration
    pub fn with_config(transport: Arc<dyn Transport>, config: EutilsConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &EutilsConfig {
        &self.config
    }

    /// E-utilities search parameters
    fn build_search_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("db", self.config.database.clone()),
            ("term", query.to_string()),
            ("retmode", "xml".to_string()),
            ("retmax", self.config.max_results.to_string()),
        ]
    }

    /// E-utilities fetch parameters for a single PMID
    fn build_fetch_params(&self, id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("db", self.config.database.clone()),
            ("id", id.to_string()),
            ("retmode", "xml".to_string()),
        ]
    }

    /// Search PubMed and return matching PMIDs in relevance order.
    ///
    /// A non-success status fails the whole query with
    /// [`SourceError::SearchFailure`]; nothing is retried.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }

        let response = self
            .transport
            .get(&self.config.search_url, &self.build_search_params(query))
            .await?;

        if !response.is_success() {
            return Err(SourceError::SearchFailure {
                status: response.status,
            });
        }

        let ids = Self::parse_search_response(&response.body)?;
        tracing::info!("PubMed search for {:?} returned {} ids", query, ids.len());
        Ok(ids)
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, SourceError> {
        let root = Element::parse(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed search XML: {}", e)))?;

        Ok(root
            .find_all(".//Id")
            .into_iter()
            .map(Element::text)
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Fetch one record and classify its authors.
    ///
    /// Returns [`SourceError::DetailFetchFailure`] on a non-success status.
    pub async fn fetch_details(&self, id: &str) -> Result<PaperRecord, SourceError> {
        let response = self
            .transport
            .get(&self.config.fetch_url, &self.build_fetch_params(id))
            .await?;

        if !response.is_success() {
            return Err(SourceError::DetailFetchFailure {
                id: id.to_string(),
                status: response.status,
            });
        }

        Self::parse_fetch_response(id, &response.body)
    }

    /// Fetch one record, absorbing any failure as `None`.
    ///
    /// Failures only ever affect this one record, so they are logged and the
    /// caller moves on to the next PMID.
    pub async fn fetch_and_classify(&self, id: &str) -> Option<PaperRecord> {
        match self.fetch_details(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping PubMed record {}: {}", id, e);
                None
            }
        }
    }

    /// Parse E-utilities fetch response XML into a classified record
    fn parse_fetch_response(id: &str, xml: &str) -> Result<PaperRecord, SourceError> {
        let root = Element::parse(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed fetch XML: {}", e)))?;

        let title = root.find_text(".//ArticleTitle");
        let year = root.find_text(".//PubDate/Year");

        let authors: Vec<AuthorEntry> = root
            .find_all(".//Author")
            .into_iter()
            .map(|author| {
                AuthorEntry::new(
                    author.find_text("LastName"),
                    author.find_text("ForeName"),
                    author.find_text(".//AffiliationInfo/Affiliation"),
                )
            })
            .collect();

        let email = root.find_text(".//AuthorList/Author/Email");

        let record = PaperRecord::new(id, title, year, &authors, email);
        tracing::debug!(
            "PubMed record {}: {} authors, {} non-academic",
            id,
            authors.len(),
            record.non_academic_authors().len()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{efetch_xml, esearch_xml, MockAuthor, MockTransport};
    use crate::sources::HttpResponse;

    fn source_with(transport: MockTransport) -> (PubMedSource, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        (PubMedSource::with_transport(transport.clone()), transport)
    }

    #[test]
    fn test_build_search_params() {
        let source = PubMedSource::with_transport(Arc::new(MockTransport::new()));
        let params = source.build_search_params("machine learning");

        assert!(params.contains(&("db", "pubmed".to_string())));
        assert!(params.contains(&("term", "machine learning".to_string())));
        assert!(params.contains(&("retmode", "xml".to_string())));
        assert!(params.contains(&("retmax", "10".to_string())));
    }

    #[test]
    fn test_build_fetch_params() {
        let source = PubMedSource::with_transport(Arc::new(MockTransport::new()));
        let params = source.build_fetch_params("123");

        assert_eq!(
            params,
            vec![
                ("db", "pubmed".to_string()),
                ("id", "123".to_string()),
                ("retmode", "xml".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_search_response_keeps_order() {
        let xml = esearch_xml(&["333", "111", "222"]);
        let ids = PubMedSource::parse_search_response(&xml).unwrap();
        assert_eq!(ids, vec!["333", "111", "222"]);
    }

    #[test]
    fn test_parse_search_response_without_ids() {
        let xml = r#"<eSearchResult><Count>0</Count><IdList/></eSearchResult>"#;
        assert!(PubMedSource::parse_search_response(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_malformed() {
        let result = PubMedSource::parse_search_response("<eSearchResult><IdList>");
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_fetch_response_full_record() {
        let xml = efetch_xml(
            "222",
            Some("Checkpoint blockade in practice"),
            Some("2023"),
            &[
                MockAuthor::new("Smith", "Jane", Some("Genentech Inc.")).email("jane@gene.com"),
                MockAuthor::new("Doe", "John", Some("Stanford University")),
            ],
        );

        let record = PubMedSource::parse_fetch_response("222", &xml).unwrap();
        assert_eq!(record.pubmed_id(), "222");
        assert_eq!(record.title(), "Checkpoint blockade in practice");
        assert_eq!(record.publication_date(), "2023");
        assert_eq!(record.non_academic_authors(), ["Jane Smith"]);
        assert_eq!(record.company_affiliations(), ["Genentech Inc."]);
        assert_eq!(record.corresponding_email(), "jane@gene.com");
    }

    #[test]
    fn test_parse_fetch_response_defaults() {
        let xml = efetch_xml("9", None, None, &[]);
        let record = PubMedSource::parse_fetch_response("9", &xml).unwrap();

        assert_eq!(record.title(), "Unknown Title");
        assert_eq!(record.publication_date(), "Unknown Date");
        assert_eq!(record.corresponding_email(), "Not Available");
        assert!(!record.has_non_academic_authors());
    }

    #[test]
    fn test_affiliation_must_be_nested_in_affiliation_info() {
        // A bare <Affiliation> directly under <Author> is not picked up
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation><Article>
            <ArticleTitle>T</ArticleTitle>
            <AuthorList>
              <Author><LastName>Flat</LastName><Affiliation>Acme Corp</Affiliation></Author>
              <Author><LastName>Nested</LastName>
                <AffiliationInfo><Affiliation>Acme Corp</Affiliation></AffiliationInfo>
              </Author>
            </AuthorList>
        </Article></MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let record = PubMedSource::parse_fetch_response("1", xml).unwrap();
        assert_eq!(record.non_academic_authors(), ["Nested"]);
    }

    #[test]
    fn test_email_is_first_found_under_author_list() {
        let xml = efetch_xml(
            "5",
            Some("T"),
            Some("2020"),
            &[
                MockAuthor::new("A", "Amy", Some("University of X")),
                MockAuthor::new("B", "Bob", Some("Biotech Co")).email("bob@biotech.co"),
                MockAuthor::new("C", "Cat", Some("Pharma Co")).email("cat@pharma.co"),
            ],
        );

        let record = PubMedSource::parse_fetch_response("5", &xml).unwrap();
        assert_eq!(record.corresponding_email(), "bob@biotech.co");
        assert_eq!(record.non_academic_authors(), ["Bob B", "Cat C"]);
    }

    #[test]
    fn test_year_only_from_pub_date() {
        let xml = r#"<PubmedArticleSet><PubmedArticle>
            <DateCompleted><Year>1999</Year></DateCompleted>
            <Journal><JournalIssue><PubDate><Year>2021</Year><Month>Mar</Month></PubDate></JournalIssue></Journal>
        </PubmedArticle></PubmedArticleSet>"#;

        let record = PubMedSource::parse_fetch_response("1", xml).unwrap();
        assert_eq!(record.publication_date(), "2021");
    }

    #[tokio::test]
    async fn test_search_sends_expected_request() {
        let (source, transport) = source_with(
            MockTransport::new().with_search("cancer immunotherapy", &["111", "222"]),
        );

        let ids = source.search("cancer immunotherapy").await.unwrap();
        assert_eq!(ids, vec!["111", "222"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, PUBMED_ESEARCH_URL);
        assert!(requests[0]
            .params
            .contains(&("term".to_string(), "cancer immunotherapy".to_string())));
    }

    #[tokio::test]
    async fn test_search_failure_carries_status() {
        let (source, _) = source_with(
            MockTransport::new().with_search_response("q", HttpResponse::new(500, "boom")),
        );

        let err = source.search("q").await.unwrap_err();
        assert!(matches!(err, SourceError::SearchFailure { status: 500 }));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let (source, transport) = source_with(MockTransport::new());
        let err = source.search("   ").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidRequest(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_is_absorbed() {
        let (source, _) = source_with(
            MockTransport::new().with_detail_response("404", HttpResponse::new(404, "")),
        );

        let err = source.fetch_details("404").await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::DetailFetchFailure { status: 404, .. }
        ));
        assert!(source.fetch_and_classify("404").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_detail_is_skipped() {
        let (source, _) = source_with(
            MockTransport::new().with_detail_response("7", HttpResponse::new(200, "<Pubmed")),
        );
        assert!(source.fetch_and_classify("7").await.is_none());
    }
}
