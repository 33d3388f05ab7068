use std::collections::HashSet;

use serde::Serialize;

use super::error::SchemaError;

/// Column holding the display name of each candidate.
pub const NAME_FIELD: &str = "name";

/// Identity and descriptive columns that are never metrics, even when numeric.
pub const EXCLUDED_FIELDS: &[&str] = &["id", NAME_FIELD, "dob", "nationality"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered set of columns usable in criteria and constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCatalog {
    metrics: Vec<String>,
}

impl MetricCatalog {
    pub fn contains(&self, metric: &str) -> bool {
        self.metrics.iter().any(|known| known == metric)
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

pub(crate) fn is_excluded(name: &str) -> bool {
    EXCLUDED_FIELDS
        .iter()
        .any(|excluded| name.eq_ignore_ascii_case(excluded))
}

/// Derives the metric catalog from column metadata, keeping dataset order.
pub fn validate_schema(columns: &[ColumnSchema]) -> Result<MetricCatalog, SchemaError> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.name.to_ascii_lowercase()) {
            return Err(SchemaError::DuplicateColumn(column.name.clone()));
        }
    }

    if !columns
        .iter()
        .any(|column| column.name.eq_ignore_ascii_case(NAME_FIELD))
    {
        return Err(SchemaError::MissingNameField { field: NAME_FIELD });
    }

    let metrics: Vec<String> = columns
        .iter()
        .filter(|column| column.kind == ColumnKind::Numeric && !is_excluded(&column.name))
        .map(|column| column.name.clone())
        .collect();

    if metrics.is_empty() {
        return Err(SchemaError::NoNumericMetrics);
    }

    Ok(MetricCatalog { metrics })
}

#[cfg(test)]
pub(crate) fn catalog_for_tests(metrics: &[&str]) -> MetricCatalog {
    MetricCatalog {
        metrics: metrics.iter().map(|metric| metric.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, kind: ColumnKind) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn excludes_identity_and_text_columns() {
        let columns = vec![
            column("id", ColumnKind::Numeric),
            column("Name", ColumnKind::Text),
            column("dob", ColumnKind::Text),
            column("Nationality", ColumnKind::Text),
            column("goals", ColumnKind::Numeric),
            column("club", ColumnKind::Text),
            column("assists", ColumnKind::Numeric),
        ];

        let catalog = validate_schema(&columns).expect("schema valid");
        assert_eq!(catalog.metrics(), ["goals".to_string(), "assists".to_string()]);
        assert!(!catalog.contains("id"));
    }

    #[test]
    fn requires_name_field() {
        let columns = vec![column("goals", ColumnKind::Numeric)];
        assert_eq!(
            validate_schema(&columns),
            Err(SchemaError::MissingNameField { field: "name" })
        );
    }

    #[test]
    fn requires_a_numeric_metric() {
        let columns = vec![
            column("id", ColumnKind::Numeric),
            column("name", ColumnKind::Text),
        ];
        assert_eq!(validate_schema(&columns), Err(SchemaError::NoNumericMetrics));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let columns = vec![
            column("name", ColumnKind::Text),
            column("goals", ColumnKind::Numeric),
            column("Goals", ColumnKind::Numeric),
        ];
        assert_eq!(
            validate_schema(&columns),
            Err(SchemaError::DuplicateColumn("Goals".to_string()))
        );
    }
}
