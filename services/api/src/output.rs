use crate::infra::{apply_overrides, parse_mode, roster_override};
use clap::Args;
use std::path::PathBuf;
use team_select::config::AppConfig;
use team_select::error::AppError;
use team_select::selection::{
    Dataset, MetricCatalog, RosterSize, SelectionMode, SelectionReport, SelectionRequest,
    TeamSelector,
};
use team_select::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SelectArgs {
    /// CSV dataset with a header row and a `name` column
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Weighted criteria, e.g. `goals=1,fouls=-0.5`
    #[arg(long)]
    pub(crate) criteria: String,
    /// Optional bounds, e.g. `fouls<=10,minutes>=2000`
    #[arg(long)]
    pub(crate) constraints: Option<String>,
    /// Number of rows to select (defaults to TEAM_SIZE or 11)
    #[arg(long, conflicts_with = "unbounded")]
    pub(crate) team_size: Option<usize>,
    /// Drop the roster constraint and let the bounds alone limit the team
    #[arg(long)]
    pub(crate) unbounded: bool,
    /// `binary` (default) or `fractional`
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<SelectionMode>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MetricsArgs {
    /// CSV dataset to inspect
    #[arg(long)]
    pub(crate) data: PathBuf,
}

pub(crate) fn run_select(args: SelectArgs) -> Result<(), AppError> {
    let SelectArgs {
        data,
        criteria,
        constraints,
        team_size,
        unbounded,
        mode,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let selection = apply_overrides(
        config.selection,
        roster_override(team_size, unbounded),
        mode,
    );
    let dataset = Dataset::from_path(&data)?;
    let mut request = SelectionRequest::new(criteria);
    if let Some(constraints) = constraints {
        request = request.with_constraints(constraints);
    }

    let report = TeamSelector::new(selection).select(&dataset, &request)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

pub(crate) fn run_metrics(args: MetricsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dataset = Dataset::from_path(&args.data)?;
    let catalog = TeamSelector::new(config.selection).catalog(&dataset)?;

    print!("{}", render_catalog(&catalog, dataset.len()));
    Ok(())
}

pub(crate) fn render_report(report: &SelectionReport) -> String {
    let mut out = String::new();

    let roster = match report.roster {
        RosterSize::Fixed(size) => format!("team of {size}"),
        RosterSize::Unbounded => "unbounded roster".to_string(),
    };
    out.push_str(&format!("Selected team ({}, {roster})\n", report.mode.label()));

    let width = report
        .team
        .iter()
        .map(|candidate| candidate.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for (position, candidate) in report.team.iter().enumerate() {
        let mut line = format!(
            "{:>3}. {:<width$}  {:>10.3}",
            position + 1,
            candidate.name,
            candidate.score,
        );
        if report.mode == SelectionMode::Fractional {
            line.push_str(&format!("  (value {:.3})", candidate.selection_value));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&format!("Team score: {:.3}\n", report.team_score));
    out.push_str(&format!("Objective value: {:.3}\n", report.objective_value));
    out.push_str(&format!(
        "Eligible rows: {} ({} excluded for missing values)\n",
        report.eligible_rows, report.excluded_rows
    ));

    if !report.constraint_checks.is_empty() {
        out.push_str("Constraint checks:\n");
        for check in &report.constraint_checks {
            out.push_str(&format!(
                "  {:<20} {:>10.3} {} {:<10.3} {}\n",
                check.label,
                check.achieved,
                check.comparator.symbol(),
                check.threshold,
                if check.satisfied { "ok" } else { "VIOLATED" }
            ));
        }
    }

    out
}

pub(crate) fn render_catalog(catalog: &MetricCatalog, rows: usize) -> String {
    let mut out = format!("{} metrics across {rows} rows\n", catalog.len());
    for metric in catalog.metrics() {
        out.push_str("  - ");
        out.push_str(metric);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use team_select::config::SelectionConfig;

    const SQUAD: &str = "id,name,goals,fouls\n1,A,5,1\n2,B,3,0\n3,C,4,2\n";

    fn dataset() -> Dataset {
        Dataset::from_reader(Cursor::new(SQUAD)).expect("dataset loads")
    }

    #[test]
    fn report_lists_team_in_rank_order() {
        let selector = TeamSelector::new(SelectionConfig {
            roster: RosterSize::Fixed(2),
            mode: SelectionMode::Binary,
        });
        let request = SelectionRequest::new("goals=1,fouls=-1").with_constraints("fouls<=1");
        let report = selector
            .select(&dataset(), &request)
            .expect("selection succeeds");

        let rendered = render_report(&report);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Selected team (binary, team of 2)");
        assert!(lines[1].contains("1. A"));
        assert!(lines[1].ends_with("4.000"));
        assert!(lines[2].contains("2. B"));
        assert!(rendered.contains("Team score: 7.000"));
        assert!(rendered.contains("fouls_max_0"));
        assert!(!rendered.contains("VIOLATED"));
    }

    #[test]
    fn catalog_lists_each_metric() {
        let catalog = TeamSelector::new(SelectionConfig::default())
            .catalog(&dataset())
            .expect("catalog");

        let rendered = render_catalog(&catalog, 3);

        assert_eq!(rendered, "2 metrics across 3 rows\n  - goals\n  - fouls\n");
    }
}
