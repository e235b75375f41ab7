use std::env;
use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snapmap::bot;
use snapmap::config::SnapMapConfig;
use snapmap::geocoding::GeocodingClient;
use snapmap::localization;
use snapmap::session_manager::SessionManager;
use snapmap::snap_map::SnapMapClient;

/// User agent sent with outbound requests; the geocoding service
/// rejects anonymous clients
const HTTP_USER_AGENT: &str = concat!("snapmap-bot/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Snap Map Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");

    // Load localized reply texts
    localization::init_localization()?;

    let config = SnapMapConfig::from_env();
    info!(
        radius_meters = config.radius_meters,
        zoom_level = config.zoom_level,
        "Loaded snapmap configuration"
    );

    // One shared HTTP client for all outbound calls
    let http = reqwest::Client::builder()
        .user_agent(HTTP_USER_AGENT)
        .build()?;

    let geocoding = Arc::new(GeocodingClient::new(http.clone(), config.geocoding_url.clone()));
    let snap_map = Arc::new(SnapMapClient::new(http, config.clone()));
    let sessions = Arc::new(SessionManager::new(config.idle_timeout));

    // Initialize the bot
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with message and callback branches
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let geocoding = Arc::clone(&geocoding);
            let snap_map = Arc::clone(&snap_map);
            let sessions = Arc::clone(&sessions);
            move |bot: Bot, msg: Message| {
                let geocoding = Arc::clone(&geocoding);
                let snap_map = Arc::clone(&snap_map);
                let sessions = Arc::clone(&sessions);
                async move { bot::message_handler(bot, msg, geocoding, snap_map, sessions).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let sessions = Arc::clone(&sessions);
            move |bot: Bot, q: teloxide::types::CallbackQuery| {
                let sessions = Arc::clone(&sessions);
                async move { bot::callback_handler(bot, q, sessions).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
