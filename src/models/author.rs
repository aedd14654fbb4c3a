//! Author entries extracted from a PubMed record.

/// Placeholder used when an author node has no `LastName`.
pub const UNKNOWN_LAST_NAME: &str = "Unknown";

/// One `Author` node of a detail response.
///
/// Only lives long enough to be classified into a
/// [`PaperRecord`](crate::models::PaperRecord).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub last_name: String,
    pub fore_name: String,
    pub affiliation: Option<String>,
}

impl AuthorEntry {
    /// Build an entry, applying the name defaults for missing parts.
    pub fn new(
        last_name: Option<String>,
        fore_name: Option<String>,
        affiliation: Option<String>,
    ) -> Self {
        Self {
            last_name: last_name.unwrap_or_else(|| UNKNOWN_LAST_NAME.to_string()),
            fore_name: fore_name.unwrap_or_default(),
            affiliation,
        }
    }

    /// `"{first} {last}"`, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fore_name, self.last_name)
            .trim()
            .to_string()
    }
}
