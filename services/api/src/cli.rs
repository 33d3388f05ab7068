use crate::output::{run_metrics, run_select, MetricsArgs, SelectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use team_select::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "team-select",
    about = "Pick the best-scoring team from a CSV of candidates using an integer program",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Select and rank a team from a dataset
    Select(SelectArgs),
    /// List the metrics a dataset offers for criteria and constraints
    Metrics(MetricsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Select(args) => run_select(args),
        Command::Metrics(args) => run_metrics(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use team_select::selection::SelectionMode;

    #[test]
    fn select_accepts_roster_and_mode_overrides() {
        let cli = Cli::try_parse_from([
            "team-select",
            "select",
            "--data",
            "players.csv",
            "--criteria",
            "goals=1,fouls=-1",
            "--constraints",
            "fouls<=10",
            "--team-size",
            "5",
            "--mode",
            "relaxed",
            "--json",
        ])
        .expect("arguments parse");

        let Some(Command::Select(args)) = cli.command else {
            panic!("expected select command");
        };
        assert_eq!(args.team_size, Some(5));
        assert_eq!(args.mode, Some(SelectionMode::Fractional));
        assert_eq!(args.constraints.as_deref(), Some("fouls<=10"));
        assert!(args.json);
    }

    #[test]
    fn team_size_conflicts_with_unbounded() {
        let result = Cli::try_parse_from([
            "team-select",
            "select",
            "--data",
            "players.csv",
            "--criteria",
            "goals=1",
            "--team-size",
            "5",
            "--unbounded",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["team-select"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
