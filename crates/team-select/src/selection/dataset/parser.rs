use std::io::Read;

use super::super::schema::{ColumnKind, ColumnSchema};

/// Cells treated as absent rather than as text.
const MISSING_MARKERS: &[&str] = &["na", "n/a", "nan", "null"];

#[derive(Debug)]
pub(crate) struct RawTable {
    pub(crate) columns: Vec<ColumnSchema>,
    pub(crate) records: Vec<Vec<Option<String>>>,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect();
    let mut records = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        records.push(record.iter().map(cell_value).collect::<Vec<_>>());
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let kind = infer_kind(records.iter().map(|cells| cells[index].as_deref()));
            ColumnSchema { name, kind }
        })
        .collect();

    Ok(RawTable { columns, records })
}

/// Numeric cells parse as finite floats; anything else is not a metric.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn infer_kind<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    let mut seen_value = false;
    for cell in cells.flatten() {
        if parse_number(cell).is_none() {
            return ColumnKind::Text;
        }
        seen_value = true;
    }

    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

fn clean_header(value: &str) -> String {
    value.replace('\u{feff}', "").trim().to_string()
}

fn cell_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}
