mod bot;
mod config;
mod models;
mod services;
mod telegram;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use bot::Bot;
use config::AppConfig;
use services::bfl::BflClient;
use services::session::SessionStore;
use services::transport::ReqwestTransport;
use telegram::TelegramClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!(environment = %config.environment, "Starting flux-edit-bot");

    // Initialize the BFL.ai edit client
    let transport = ReqwestTransport::new(Duration::from_secs(config.bfl_request_timeout))
        .expect("Failed to initialize HTTP transport");
    let editor = BflClient::new(
        Arc::new(transport),
        config.bfl_api_url.clone(),
        config.bfl_api_key.clone(),
        config.output_format,
        config.safety_tolerance,
        config.bfl_max_polls,
        Duration::from_secs(config.bfl_poll_interval),
    );

    // Initialize the Telegram client
    let telegram = TelegramClient::new(&config.telegram_bot_token)
        .expect("Failed to initialize Telegram client");

    let bot = Arc::new(Bot::new(telegram, editor, SessionStore::new(), config));

    tracing::info!("Bot started, polling for updates");
    bot.run().await;
}
