//! Console table rendering.

use comfy_table::{Attribute, Cell, Table};

use super::csv::CSV_HEADER;
use super::LIST_DELIMITER;
use crate::models::PaperRecord;

/// Build a table with one row per paper and the same columns as the CSV export.
pub fn render_table(papers: &[PaperRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_header(CSV_HEADER.to_vec());

    for paper in papers {
        table.add_row(vec![
            Cell::new(paper.pubmed_id()),
            Cell::new(paper.title()).add_attribute(Attribute::Bold),
            Cell::new(paper.publication_date()),
            Cell::new(paper.non_academic_authors().join(LIST_DELIMITER)),
            Cell::new(paper.company_affiliations().join(LIST_DELIMITER)),
            Cell::new(paper.corresponding_email()),
        ]);
    }

    table
}
