use anyhow::Result;
use clap::Parser;
use f1_sprint::cli::{run, Cli};
use f1_sprint::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Kaggle credentials may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_file())?;
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
