mod classify;
mod cli;
mod config;
mod logging;
mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::initialize_logging()?;

    tracing::debug!("starting triage");

    cli::run().await?;

    Ok(())
}
