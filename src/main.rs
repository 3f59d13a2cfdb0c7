use clap::Parser;
use log::warn;
use org_stats::api::Error;
use org_stats_app::{leaderboard, Args};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let stats = tokio::select! {
        stats = org_stats_app::gather_org_stats(&args) => stats?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, discarding partial results");
            return Ok(());
        }
    };

    for (rank, (login, user)) in leaderboard(&stats, args.top).into_iter().enumerate() {
        println!("{}. {}\t{}", rank + 1, login, user);
    }

    Ok(())
}
