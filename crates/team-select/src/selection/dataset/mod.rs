mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::domain::{CandidateRow, RowId};
use super::error::{DatasetError, SchemaError};
use super::schema::{ColumnSchema, MetricCatalog, NAME_FIELD};

pub(crate) use parser::parse_number;

/// Immutable snapshot of a loaded CSV file.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<ColumnSchema>,
    records: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let table = parser::parse_table(reader)?;
        debug!(
            columns = table.columns.len(),
            rows = table.records.len(),
            "dataset loaded"
        );

        Ok(Self {
            columns: table.columns,
            records: table.records,
        })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Materializes one candidate per record. Catalog columns become metrics;
    /// everything else except the name is kept as a display attribute.
    pub fn candidates(&self, catalog: &MetricCatalog) -> Result<Vec<CandidateRow>, SchemaError> {
        let name_index = self
            .columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(NAME_FIELD))
            .ok_or(SchemaError::MissingNameField { field: NAME_FIELD })?;

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(position, cells)| {
                let mut metrics = BTreeMap::new();
                let mut attributes = BTreeMap::new();

                for (index, column) in self.columns.iter().enumerate() {
                    if index == name_index {
                        continue;
                    }
                    let Some(value) = cells[index].as_deref() else {
                        continue;
                    };

                    if catalog.contains(&column.name) {
                        if let Some(number) = parse_number(value) {
                            metrics.insert(column.name.clone(), number);
                        }
                    } else {
                        attributes.insert(column.name.clone(), value.to_string());
                    }
                }

                CandidateRow {
                    id: RowId(position),
                    name: cells[name_index].clone().unwrap_or_default(),
                    metrics,
                    attributes,
                }
            })
            .collect();

        Ok(rows)
    }
}
