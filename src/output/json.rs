//! JSON envelope for paper records.

use serde::{Deserialize, Serialize};

use super::OutputError;
use crate::models::PaperRecord;

/// `{"papers": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PapersEnvelope {
    pub papers: Vec<PaperRecord>,
}

#[derive(Serialize)]
struct PapersRef<'a> {
    papers: &'a [PaperRecord],
}

/// Pretty-printed `{"papers": [...]}` document.
pub fn to_json_string(papers: &[PaperRecord]) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&PapersRef { papers })?)
}

/// `{"papers": [...]}` as a JSON value.
pub fn to_json_value(papers: &[PaperRecord]) -> Result<serde_json::Value, OutputError> {
    Ok(serde_json::to_value(PapersRef { papers })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::sample_papers;

    #[test]
    fn test_envelope_shape() {
        let value = to_json_value(&sample_papers()).unwrap();
        let papers = value["papers"].as_array().unwrap();

        assert_eq!(papers.len(), 3);
        assert_eq!(papers[0]["PubmedID"], "1");
        assert_eq!(papers[0]["Non-academic Authors"][1], "Emily White");
        assert_eq!(papers[0]["Company Affiliations"][1], "Biotech Ltd.");
    }

    #[test]
    fn test_empty_envelope() {
        let json = to_json_string(&[]).unwrap();
        let parsed: PapersEnvelope = serde_json::from_str(&json).unwrap();
        assert!(parsed.papers.is_empty());
    }

    #[test]
    fn test_string_parses_back() {
        let papers = sample_papers();
        let parsed: PapersEnvelope = serde_json::from_str(&to_json_string(&papers).unwrap()).unwrap();
        assert_eq!(parsed.papers, papers);
    }
}
