use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{CandidateRow, Objective, RosterSize, RowId, SelectionMode};
use super::solver::Assignment;

/// Distance from 1 within which a binary variable counts as selected.
pub const SELECTION_TOLERANCE: f64 = 1e-6;

/// A selected row with its standalone score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub row_id: RowId,
    pub name: String,
    pub score: f64,
    /// Solved value of the row's selection variable.
    pub selection_value: f64,
}

/// Orders the rows chosen by `assignment` by individual score, highest first.
///
/// Ties fall back to ascending row id, so equal input always yields the same
/// order. A fixed roster caps the output length in both modes.
pub fn rank(
    rows: &[CandidateRow],
    assignment: &Assignment,
    objective: &Objective,
    mode: SelectionMode,
    roster: RosterSize,
) -> Vec<RankedCandidate> {
    let candidates = rows.iter().filter_map(|row| {
        assignment.value(row.id).map(|value| RankedCandidate {
            row_id: row.id,
            name: row.name.clone(),
            score: row.individual_score(objective),
            selection_value: value,
        })
    });

    let mut selected: Vec<RankedCandidate> = match mode {
        SelectionMode::Binary => candidates
            .filter(|candidate| (candidate.selection_value - 1.0).abs() < SELECTION_TOLERANCE)
            .collect(),
        SelectionMode::Fractional => {
            let mut pool: Vec<RankedCandidate> = candidates.collect();
            pool.sort_by(|left, right| {
                right
                    .selection_value
                    .total_cmp(&left.selection_value)
                    .then_with(|| by_score(left, right))
            });
            match roster {
                RosterSize::Fixed(team_size) => pool.truncate(team_size),
                RosterSize::Unbounded => {
                    pool.retain(|candidate| candidate.selection_value > SELECTION_TOLERANCE)
                }
            }
            pool
        }
    };

    selected.sort_by(by_score);
    if let RosterSize::Fixed(team_size) = roster {
        selected.truncate(team_size);
    }
    selected
}

fn by_score(left: &RankedCandidate, right: &RankedCandidate) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.row_id.cmp(&right.row_id))
}
