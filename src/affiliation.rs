//! Academic vs. industry classification of author affiliations.
//!
//! An author counts as non-academic when they have an affiliation and that
//! affiliation mentions none of [`ACADEMIC_KEYWORDS`] (case-insensitive
//! substring match). Authors without any affiliation never qualify.

use crate::models::{AuthorEntry, PaperRecord};

/// Substrings that mark an affiliation as academic or clinical.
pub const ACADEMIC_KEYWORDS: [&str; 4] = ["university", "college", "institute", "hospital"];

/// Whether `affiliation` looks like a company rather than an academic or
/// clinical institution.
pub fn is_non_academic(affiliation: &str) -> bool {
    let lowered = affiliation.to_lowercase();
    !ACADEMIC_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Split out the non-academic authors as parallel `(names, affiliations)`
/// lists, preserving encounter order.
pub fn classify_authors(authors: &[AuthorEntry]) -> (Vec<String>, Vec<String>) {
    authors
        .iter()
        .filter_map(|author| {
            let affiliation = author.affiliation.as_deref()?;
            if affiliation.is_empty() || !is_non_academic(affiliation) {
                return None;
            }
            Some((author.full_name(), affiliation.to_string()))
        })
        .unzip()
}

/// Keep only papers with at least one company affiliation containing
/// `company` (case-insensitive).
pub fn filter_by_company(papers: Vec<PaperRecord>, company: &str) -> Vec<PaperRecord> {
    let needle = company.to_lowercase();
    papers
        .into_iter()
        .filter(|paper| {
            paper
                .company_affiliations()
                .iter()
                .any(|affiliation| affiliation.to_lowercase().contains(&needle))
        })
        .collect()
}
