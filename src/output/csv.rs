//! CSV export of paper records.
//!
//! One header row followed by one row per paper. Author and affiliation
//! lists are joined with [`LIST_DELIMITER`]; fields are quoted only when the
//! CSV rules require it.

use std::io::{Read, Write};
use std::path::Path;

use super::{OutputError, LIST_DELIMITER};
use crate::models::PaperRecord;

/// Column names of the export, in order.
pub const CSV_HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Write `papers` as CSV to any writer.
pub fn write_papers<W: Write>(writer: W, papers: &[PaperRecord]) -> Result<(), OutputError> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for paper in papers {
        wtr.write_record([
            paper.pubmed_id(),
            paper.title(),
            paper.publication_date(),
            paper.non_academic_authors().join(LIST_DELIMITER).as_str(),
            paper.company_affiliations().join(LIST_DELIMITER).as_str(),
            paper.corresponding_email(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render `papers` as an in-memory CSV document.
pub fn to_csv_string(papers: &[PaperRecord]) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    write_papers(&mut buf, papers)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `papers` to a CSV file at `path`, replacing any existing file.
pub fn save_papers(path: &Path, papers: &[PaperRecord]) -> Result<(), OutputError> {
    let file = std::fs::File::create(path)?;
    write_papers(std::io::BufWriter::new(file), papers)?;
    tracing::debug!("Wrote {} papers to {}", papers.len(), path.display());
    Ok(())
}

/// Parse a CSV export back into records.
///
/// List cells are split on [`LIST_DELIMITER`]. The affiliation cell is split
/// into at most as many items as there are authors, so a delimiter inside an
/// affiliation stays part of the last one. A row whose lists still differ in
/// length yields [`OutputError::Record`].
pub fn read_papers<R: Read>(reader: R) -> Result<Vec<PaperRecord>, OutputError> {
    let mut rdr = ::csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(OutputError::Header(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut papers = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cell = |i: usize| row.get(i).unwrap_or_default().to_string();

        let authors = split_list(&cell(3));
        let affiliations = split_affiliations(&cell(4), authors.len());

        let paper = PaperRecord::from_parts(
            cell(0),
            cell(1),
            cell(2),
            authors,
            affiliations,
            cell(5),
        )
        .map_err(|source| OutputError::Record { line, source })?;
        papers.push(paper);
    }

    Ok(papers)
}

fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_DELIMITER).map(str::to_string).collect()
}

fn split_affiliations(cell: &str, authors: usize) -> Vec<String> {
    if cell.is_empty() || authors == 0 {
        return split_list(cell);
    }
    cell.splitn(authors, LIST_DELIMITER)
        .map(str::to_string)
        .collect()
}
