//! Paper record emitted for every PubMed hit with industry authors.

use serde::{Deserialize, Serialize};

use crate::affiliation::classify_authors;
use crate::models::AuthorEntry;

/// Title used when a record has no `ArticleTitle`.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Publication year used when a record has no `PubDate/Year`.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Email used when no author carries an `Email` node.
pub const EMAIL_NOT_AVAILABLE: &str = "Not Available";

/// A PubMed paper together with its non-academic authors.
///
/// `non_academic_authors` and `company_affiliations` are parallel: entry `i`
/// of one belongs to entry `i` of the other. The constructors are the only
/// way to build a record, so the two lists always have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaperRecord")]
pub struct PaperRecord {
    /// PubMed identifier (PMID)
    #[serde(rename = "PubmedID")]
    pubmed_id: String,

    #[serde(rename = "Title")]
    title: String,

    /// Publication year, or [`UNKNOWN_DATE`]
    #[serde(rename = "Publication Date")]
    publication_date: String,

    #[serde(rename = "Non-academic Authors")]
    non_academic_authors: Vec<String>,

    #[serde(rename = "Company Affiliations")]
    company_affiliations: Vec<String>,

    #[serde(rename = "Corresponding Author Email")]
    corresponding_email: String,
}

impl PaperRecord {
    /// Build a record by classifying `authors`.
    ///
    /// Missing title, date or email fall back to their placeholders.
    pub fn new(
        pubmed_id: impl Into<String>,
        title: Option<String>,
        publication_date: Option<String>,
        authors: &[AuthorEntry],
        corresponding_email: Option<String>,
    ) -> Self {
        let (non_academic_authors, company_affiliations) = classify_authors(authors);

        Self {
            pubmed_id: pubmed_id.into(),
            title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            publication_date: publication_date.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            non_academic_authors,
            company_affiliations,
            corresponding_email: corresponding_email
                .unwrap_or_else(|| EMAIL_NOT_AVAILABLE.to_string()),
        }
    }

    /// Rebuild a record from already-classified parts (e.g. a CSV row).
    pub fn from_parts(
        pubmed_id: String,
        title: String,
        publication_date: String,
        non_academic_authors: Vec<String>,
        company_affiliations: Vec<String>,
        corresponding_email: String,
    ) -> Result<Self, RecordError> {
        if pubmed_id.trim().is_empty() {
            return Err(RecordError::MissingId);
        }
        if non_academic_authors.len() != company_affiliations.len() {
            return Err(RecordError::LengthMismatch {
                authors: non_academic_authors.len(),
                affiliations: company_affiliations.len(),
            });
        }

        Ok(Self {
            pubmed_id,
            title,
            publication_date,
            non_academic_authors,
            company_affiliations,
            corresponding_email,
        })
    }

    pub fn pubmed_id(&self) -> &str {
        &self.pubmed_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    pub fn non_academic_authors(&self) -> &[String] {
        &self.non_academic_authors
    }

    pub fn company_affiliations(&self) -> &[String] {
        &self.company_affiliations
    }

    pub fn corresponding_email(&self) -> &str {
        &self.corresponding_email
    }

    /// Whether at least one author qualified as non-academic
    pub fn has_non_academic_authors(&self) -> bool {
        !self.non_academic_authors.is_empty()
    }

    /// Author/affiliation pairs in encounter order
    pub fn industry_authors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.non_academic_authors
            .iter()
            .zip(&self.company_affiliations)
            .map(|(a, c)| (a.as_str(), c.as_str()))
    }
}

/// Errors raised when rebuilding a record from external data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record has no PubMed ID")]
    MissingId,

    #[error("{authors} non-academic authors but {affiliations} company affiliations")]
    LengthMismatch { authors: usize, affiliations: usize },
}

#[derive(Deserialize)]
struct RawPaperRecord {
    #[serde(rename = "PubmedID")]
    pubmed_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Publication Date")]
    publication_date: String,
    #[serde(rename = "Non-academic Authors", default)]
    non_academic_authors: Vec<String>,
    #[serde(rename = "Company Affiliations", default)]
    company_affiliations: Vec<String>,
    #[serde(rename = "Corresponding Author Email")]
    corresponding_email: String,
}

impl TryFrom<RawPaperRecord> for PaperRecord {
    type Error = RecordError;

    fn try_from(raw: RawPaperRecord) -> Result<Self, Self::Error> {
        PaperRecord::from_parts(
            raw.pubmed_id,
            raw.title,
            raw.publication_date,
            raw.non_academic_authors,
            raw.company_affiliations,
            raw.corresponding_email,
        )
    }
}
