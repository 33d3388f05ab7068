use team_select_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("team-select error: {err}");
        std::process::exit(1);
    }
}
