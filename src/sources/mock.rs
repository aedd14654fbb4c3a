//! Mock transport and example data for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{AuthorEntry, PaperRecord};
use crate::sources::{HttpResponse, SourceError, Transport};

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first parameter called `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A transport that serves canned E-utilities responses.
///
/// Requests carrying a `term` parameter are answered from the search table,
/// requests carrying an `id` parameter from the detail table. Unknown search
/// terms get an empty result set; unknown ids get a 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    searches: HashMap<String, HttpResponse>,
    details: HashMap<String, HttpResponse>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `term` with these PMIDs.
    pub fn with_search(self, term: &str, ids: &[&str]) -> Self {
        self.with_search_response(term, HttpResponse::new(200, esearch_xml(ids)))
    }

    /// Answer `term` with an arbitrary response.
    pub fn with_search_response(mut self, term: &str, response: HttpResponse) -> Self {
        self.searches.insert(term.to_string(), response);
        self
    }

    /// Answer the detail request for `id` with this XML body.
    pub fn with_detail(self, id: &str, xml: impl Into<String>) -> Self {
        self.with_detail_response(id, HttpResponse::new(200, xml))
    }

    /// Answer the detail request for `id` with an arbitrary response.
    pub fn with_detail_response(mut self, id: &str, response: HttpResponse) -> Self {
        self.details.insert(id.to_string(), response);
        self
    }

    /// Hold the detail response for `id` back by `delay`.
    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// PMIDs requested from the detail endpoint, in arrival order.
    pub fn detail_ids(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.param("id").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<HttpResponse, SourceError> {
        let request = RecordedRequest {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        self.requests.lock().unwrap().push(request.clone());

        if let Some(term) = request.param("term") {
            return Ok(self
                .searches
                .get(term)
                .cloned()
                .unwrap_or_else(|| HttpResponse::new(200, esearch_xml(&[]))));
        }

        let id = request.param("id").unwrap_or_default();
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }

        Ok(self
            .details
            .get(id)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "")))
    }
}

/// Author used to build an `efetch` fixture.
#[derive(Debug, Clone, Default)]
pub struct MockAuthor {
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub affiliation: Option<String>,
    pub email: Option<String>,
}

impl MockAuthor {
    pub fn new(last_name: &str, fore_name: &str, affiliation: Option<&str>) -> Self {
        Self {
            last_name: Some(last_name.to_string()),
            fore_name: Some(fore_name.to_string()),
            affiliation: affiliation.map(str::to_string),
            email: None,
        }
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// `esearch` response listing `ids`.
pub fn esearch_xml(ids: &[&str]) -> String {
    let id_nodes: String = ids
        .iter()
        .map(|id| format!("<Id>{}</Id>", escape(id)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult><Count>{count}</Count><RetMax>{count}</RetMax><RetStart>0</RetStart><IdList>{id_nodes}</IdList></eSearchResult>"#,
        count = ids.len(),
    )
}

/// `efetch` response for a single article.
pub fn efetch_xml(
    pmid: &str,
    title: Option<&str>,
    year: Option<&str>,
    authors: &[MockAuthor],
) -> String {
    let title = title
        .map(|t| format!("<ArticleTitle>{}</ArticleTitle>", escape(t)))
        .unwrap_or_default();
    let year = year
        .map(|y| format!("<Year>{}</Year>", escape(y)))
        .unwrap_or_default();

    let author_nodes: String = authors
        .iter()
        .map(|a| {
            let mut node = String::from(r#"<Author ValidYN="Y">"#);
            if let Some(last) = &a.last_name {
                node.push_str(&format!("<LastName>{}</LastName>", escape(last)));
            }
            if let Some(fore) = &a.fore_name {
                node.push_str(&format!("<ForeName>{}</ForeName>", escape(fore)));
            }
            if let Some(affiliation) = &a.affiliation {
                node.push_str(&format!(
                    "<AffiliationInfo><Affiliation>{}</Affiliation></AffiliationInfo>",
                    escape(affiliation)
                ));
            }
            if let Some(email) = &a.email {
                node.push_str(&format!("<Email>{}</Email>", escape(email)));
            }
            node.push_str("</Author>");
            node
        })
        .collect();

    format!(
        r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">{pmid}</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate>{year}<Month>Jan</Month></PubDate>
          </JournalIssue>
        </Journal>
        {title}
        <AuthorList CompleteYN="Y">{author_nodes}</AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#,
        pmid = escape(pmid),
    )
}

/// Hand-written records for exercising the output formats.
pub fn sample_papers() -> Vec<PaperRecord> {
    let author = |last: &str, first: &str, affiliation: &str| {
        AuthorEntry::new(
            Some(last.to_string()),
            Some(first.to_string()),
            Some(affiliation.to_string()),
        )
    };

    vec![
        PaperRecord::new(
            "1",
            Some("Impact of CDA dynamics, revisited".to_string()),
            Some("2024".to_string()),
            &[
                author("Doe", "John", "Pharma Co."),
                author("White", "Emily", "Biotech Ltd."),
            ],
            Some("john.doe@pharmaco.com".to_string()),
        ),
        PaperRecord::new(
            "2",
            Some("Universal \"driving\" signals".to_string()),
            Some("2023".to_string()),
            &[author("Green", "Alice", "HealthTech Inc.")],
            Some("alice.green@healthtech.com".to_string()),
        ),
        PaperRecord::new(
            "3",
            None,
            None,
            &[author("Brown", "Bob", "NeuroTech Solutions, Boston, MA")],
            None,
        ),
    ]
}
