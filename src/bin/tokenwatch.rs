use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use eth_token_watch::GECKO_API_BASE;
use eth_token_watch::config::{AppConfig, CONFIG_PATH};
use eth_token_watch::notifier::{TelegramConfig, TelegramNotifier};
use eth_token_watch::reporter;
use eth_token_watch::runner;
use eth_token_watch::store::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "tokenwatch",
    about = "Watch GeckoTerminal new pools and alert on unseen tokens via Telegram"
)]
struct Args {
    /// Config file path
    #[arg(long, default_value = CONFIG_PATH)]
    config: String,

    /// Override the processed-token store path
    #[arg(long)]
    state_file: Option<String>,

    /// Log what would be sent instead of calling the Telegram API (no save)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(Path::new(&args.config))?;
    let settings = config.settings;
    let state_file = args.state_file.unwrap_or(settings.state_file);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()?;

    let store = JsonFileStore::new(&state_file);
    let notifier = TelegramNotifier::new(client.clone(), TelegramConfig::from_env());

    let mode = if args.dry_run { "dry-run" } else { "live" };
    info!(
        "Starting tokenwatch ({mode}) — network={} state_file={state_file} notifier_configured={}",
        settings.network,
        notifier.is_configured(),
    );

    let report = runner::run(
        &client,
        GECKO_API_BASE,
        &settings.network,
        &store,
        &notifier,
        args.dry_run,
    )
    .await?;
    reporter::report_run(&report);

    Ok(())
}
