mod cli;
mod infra;
mod output;
mod routes;
mod server;

use team_select::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
