// src/process/extract.rs

use scraper::{ElementRef, Html, Selector};
use std::ops::Deref;
use tracing::debug;

use super::convert::{decode_magnitude, decode_percentage};
use crate::error::{Error, FormatError, Result, StructureError};
use crate::schema::RankingRecord;

const CELLS_PER_ROW: usize = 5;

/// Read-only lookup of an element by tag and `id` attribute.
pub trait Document {
    type Element<'a>: Node
    where
        Self: 'a;

    fn find_by_id<'a>(&'a self, tag: &str, id: &str) -> Option<Self::Element<'a>>;
}

/// An element in a parsed document.
pub trait Node: Sized {
    /// Direct child elements named `tag`, in document order.
    fn children(&self, tag: &str) -> Vec<Self>;

    /// All descendant text, concatenated.
    fn text(&self) -> String;
}

impl Document for Html {
    type Element<'a> = ElementRef<'a>;

    fn find_by_id<'a>(&'a self, tag: &str, id: &str) -> Option<ElementRef<'a>> {
        // the id may contain anything, so match on the attribute instead of a css id selector
        let sel = Selector::parse(tag).ok()?;
        self.select(&sel).find(|el| el.value().attr("id") == Some(id))
    }
}

impl<'a> Node for ElementRef<'a> {
    fn children(&self, tag: &str) -> Vec<Self> {
        Deref::deref(self)
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .collect()
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }
}

/// Lazy, single-pass iterator over the body rows of the ranking table.
pub struct Rankings<N> {
    rows: std::vec::IntoIter<N>,
    row: usize,
}

impl<N: Node> Iterator for Rankings<N> {
    type Item = Result<RankingRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let tr = self.rows.next()?;
        self.row += 1;
        Some(decode_row(self.row, &tr))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

/// Locate `<table id=table_id>` and iterate its `<tbody>` rows in order.
pub fn extract<'a, D: Document>(
    document: &'a D,
    table_id: &str,
) -> std::result::Result<Rankings<D::Element<'a>>, StructureError> {
    let table = document
        .find_by_id("table", table_id)
        .ok_or_else(|| StructureError::MissingTable {
            id: table_id.to_string(),
        })?;
    let tbody = table
        .children("tbody")
        .into_iter()
        .next()
        .ok_or_else(|| StructureError::MissingBody {
            id: table_id.to_string(),
        })?;

    let rows = tbody.children("tr");
    debug!(table = table_id, rows = rows.len(), "located ranking table");
    Ok(Rankings {
        rows: rows.into_iter(),
        row: 0,
    })
}

/// Extract every row, stopping at the first failure.
pub fn collect_rankings<D: Document>(document: &D, table_id: &str) -> Result<Vec<RankingRecord>> {
    extract(document, table_id)?.collect()
}

fn decode_row<N: Node>(row: usize, tr: &N) -> Result<RankingRecord> {
    let cells = tr.children("td");
    let [_flag, country, population, penetration, users] =
        <[N; CELLS_PER_ROW]>::try_from(cells).map_err(|cells| StructureError::CellCount {
            row,
            found: cells.len(),
        })?;

    let country = country.text();
    let country = country.trim();
    if country.is_empty() {
        return Err(StructureError::EmptyCountry { row }.into());
    }

    let record = RankingRecord::new(
        country,
        cell(row, "total_population", &population, decode_magnitude)?,
        cell(row, "smartphone_penetration", &penetration, decode_percentage)?,
        cell(row, "smartphone_users", &users, decode_magnitude)?,
    );
    debug!(row, country = record.country(), "decoded row");
    Ok(record)
}

fn cell<N, F>(row: usize, column: &'static str, node: &N, decode: F) -> Result<rust_decimal::Decimal>
where
    N: Node,
    F: Fn(&str) -> std::result::Result<rust_decimal::Decimal, FormatError>,
{
    let text = node.text();
    decode(text.trim()).map_err(|source| Error::Decode {
        row,
        column,
        source,
    })
}
