use anyhow::Result;
use clap::Parser;
use data_loader::{load_config, run_app, run_http, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => run_app(load_config(token)?).await,
        Commands::ServeHttp => run_http(load_config(None)?).await,
    }
}
