use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use team_select::config::SelectionConfig;
use team_select::selection::{RosterSize, SelectionMode};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_mode(raw: &str) -> Result<SelectionMode, String> {
    raw.parse::<SelectionMode>()
}

/// Roster requested on the command line, if any flag set one.
pub(crate) fn roster_override(team_size: Option<usize>, unbounded: bool) -> Option<RosterSize> {
    if unbounded {
        Some(RosterSize::Unbounded)
    } else {
        team_size.map(RosterSize::Fixed)
    }
}

/// Applies command-line overrides on top of the loaded selection defaults.
pub(crate) fn apply_overrides(
    mut config: SelectionConfig,
    roster: Option<RosterSize>,
    mode: Option<SelectionMode>,
) -> SelectionConfig {
    if let Some(roster) = roster {
        config.roster = roster;
    }
    if let Some(mode) = mode {
        config.mode = mode;
    }
    config
}
