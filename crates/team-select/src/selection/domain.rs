use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of a candidate in the loaded dataset. Selection variables are
/// indexed by this value, so it stays stable when rows are filtered out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One selectable entity from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub id: RowId,
    pub name: String,
    /// Numeric metric values. A missing cell is an absent key.
    pub metrics: BTreeMap<String, f64>,
    /// Descriptive fields carried through for display, never modelled.
    pub attributes: BTreeMap<String, String>,
}

impl CandidateRow {
    pub fn metric(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    /// Weighted sum of this row's metrics, independent of any selection.
    ///
    /// Callers must have filtered rows missing an objective metric; a missing
    /// value contributes nothing here.
    pub fn individual_score(&self, objective: &Objective) -> f64 {
        objective
            .iter()
            .fold(0.0, |total, (metric, weight)| {
                total + weight * self.metric(metric).unwrap_or(0.0)
            })
    }
}

/// A single `metric=weight` term of the objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub metric: String,
    pub weight: f64,
}

/// Metric to weight mapping with unique keys, kept in the order the user
/// declared them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    criteria: Vec<Criterion>,
}

impl Objective {
    pub(crate) fn from_criteria(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn weight(&self, metric: &str) -> Option<f64> {
        self.criteria
            .iter()
            .find(|criterion| criterion.metric == metric)
            .map(|criterion| criterion.weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.criteria
            .iter()
            .map(|criterion| (criterion.metric.as_str(), criterion.weight))
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    AtMost,
    AtLeast,
    Equal,
}

impl Comparator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::AtMost => "<=",
            Comparator::AtLeast => ">=",
            Comparator::Equal => "=",
        }
    }

    /// Short name used in generated constraint labels.
    pub fn label(&self) -> &'static str {
        match self {
            Comparator::AtMost => "max",
            Comparator::AtLeast => "min",
            Comparator::Equal => "eq",
        }
    }

    pub fn holds(&self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Comparator::AtMost => lhs <= rhs + tolerance,
            Comparator::AtLeast => lhs >= rhs - tolerance,
            Comparator::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

/// Bound on the sum of a metric over the selected rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub metric: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.metric,
            self.comparator.symbol(),
            self.threshold
        )
    }
}

/// Domain of the per-row selection variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Each variable is 0 or 1 and the solver enforces the exact roster.
    #[default]
    Binary,
    /// Each variable is relaxed to [0, 1]; the top rows by value are kept
    /// afterwards. Declared constraints bind the relaxation, not the kept rows.
    Fractional,
}

impl SelectionMode {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionMode::Binary => "binary",
            SelectionMode::Fractional => "fractional",
        }
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binary" | "integer" => Ok(Self::Binary),
            "fractional" | "relaxed" => Ok(Self::Fractional),
            other => Err(format!(
                "unknown selection mode '{other}' (expected binary or fractional)"
            )),
        }
    }
}

/// Whether the model pins the number of selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "size")]
pub enum RosterSize {
    Fixed(usize),
    /// Selection is bounded by the declared constraints alone.
    Unbounded,
}

impl RosterSize {
    pub fn fixed(&self) -> Option<usize> {
        match self {
            RosterSize::Fixed(size) => Some(*size),
            RosterSize::Unbounded => None,
        }
    }
}
