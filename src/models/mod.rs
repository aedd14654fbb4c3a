//! Core data models for PubMed papers and their authors.

mod author;
mod paper;

pub use author::{AuthorEntry, UNKNOWN_LAST_NAME};
pub use paper::{
    PaperRecord, RecordError, EMAIL_NOT_AVAILABLE, UNKNOWN_DATE, UNKNOWN_TITLE,
};
