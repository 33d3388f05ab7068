//! Parsers for the `metric=weight,...` and `metric<=value,...` input syntax.
//!
//! Both entry points validate the whole input before returning, so a caller
//! either receives every item or a single [`ParseError`] naming the first bad
//! token.

use std::collections::HashSet;

use tracing::debug;

use super::dataset::parse_number;
use super::domain::{Comparator, Constraint, Criterion, Objective};
use super::error::{ParseError, ParseErrorReason};
use super::schema::MetricCatalog;

const ITEM_SEPARATOR: char = ',';

/// Two-character comparators come first so `<=` is never read as `<` then `=`.
/// `==` is accepted as a spelling of equality.
const COMPARATORS: &[(&str, Comparator)] = &[
    ("<=", Comparator::AtMost),
    (">=", Comparator::AtLeast),
    ("==", Comparator::Equal),
    ("=", Comparator::Equal),
];

/// Parses `metric=weight[,metric=weight...]` into an [`Objective`].
///
/// Weights may be negative (`fouls=-1`). A metric named twice is rejected.
pub fn parse_criteria(text: &str, catalog: &MetricCatalog) -> Result<Objective, ParseError> {
    let mut criteria = Vec::new();
    let mut seen = HashSet::new();

    for item in items(text, ParseErrorReason::EmptyCriteria)? {
        let (metric, weight) = match item.split_once('=') {
            Some((metric, weight)) if !weight.contains('=') => (metric.trim(), weight.trim()),
            _ => return Err(ParseError::new(ParseErrorReason::MalformedItem, item)),
        };

        if metric.is_empty() {
            return Err(ParseError::new(ParseErrorReason::MalformedItem, item));
        }

        let weight = parse_number(weight)
            .ok_or_else(|| ParseError::new(ParseErrorReason::NonNumericValue, item))?;

        if !catalog.contains(metric) {
            return Err(ParseError::new(ParseErrorReason::UnknownMetric, metric));
        }
        if !seen.insert(metric) {
            return Err(ParseError::new(ParseErrorReason::DuplicateMetric, metric));
        }

        criteria.push(Criterion {
            metric: metric.to_string(),
            weight,
        });
    }

    debug!(criteria = criteria.len(), "criteria parsed");
    Ok(Objective::from_criteria(criteria))
}

/// Parses `metric<=value`, `metric>=value` and `metric=value` items.
pub fn parse_constraints(
    text: &str,
    catalog: &MetricCatalog,
) -> Result<Vec<Constraint>, ParseError> {
    let mut constraints = Vec::new();

    for item in items(text, ParseErrorReason::EmptyConstraints)? {
        let (metric, comparator, threshold) = split_comparator(item)
            .ok_or_else(|| ParseError::new(ParseErrorReason::NoComparator, item))?;

        if metric.is_empty() {
            return Err(ParseError::new(ParseErrorReason::MalformedItem, item));
        }

        let threshold = parse_number(threshold)
            .ok_or_else(|| ParseError::new(ParseErrorReason::NonNumericValue, item))?;

        if !catalog.contains(metric) {
            return Err(ParseError::new(ParseErrorReason::UnknownMetric, metric));
        }

        constraints.push(Constraint {
            metric: metric.to_string(),
            comparator,
            threshold,
        });
    }

    debug!(constraints = constraints.len(), "constraints parsed");
    Ok(constraints)
}

fn items(text: &str, empty: ParseErrorReason) -> Result<Vec<&str>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::new(empty, text));
    }

    text.split(ITEM_SEPARATOR)
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(ParseError::new(ParseErrorReason::MalformedItem, text.trim()))
            } else {
                Ok(item)
            }
        })
        .collect()
}

fn split_comparator(item: &str) -> Option<(&str, Comparator, &str)> {
    COMPARATORS.iter().find_map(|(token, comparator)| {
        item.split_once(token)
            .map(|(metric, threshold)| (metric.trim(), *comparator, threshold.trim()))
    })
}
