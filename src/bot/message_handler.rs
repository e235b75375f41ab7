//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{debug, error, info};

// Import localization
use crate::localization::t_lang;

// Import clients and session types
use crate::geocoding::GeocodingClient;
use crate::session::{PaginationSession, SnapView};
use crate::session_manager::SessionManager;
use crate::snap_map::{SnapMapClient, TileSetType};

// Import UI builder functions
use super::ui_builder::{create_pagination_keyboard, format_snap_caption};

/// Handle one incoming `/snapmap` invocation end to end: geocode the
/// query, fetch the snap feed and open a pagination session on success.
/// The two no-result outcomes get their own replies; upstream failures
/// are logged and answered with a generic failure reply.
async fn handle_snapmap_command(
    bot: &Bot,
    msg: &Message,
    query: &str,
    geocoding: Arc<GeocodingClient>,
    snap_map: Arc<SnapMapClient>,
    sessions: Arc<SessionManager>,
    language_code: Option<&str>,
) -> Result<()> {
    if query.is_empty() {
        bot.send_message(msg.chat.id, t_lang("snapmap-usage", language_code))
            .await?;
        return Ok(());
    }

    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Ignoring snapmap command without a sender");
        return Ok(());
    };

    debug!(user_id = %user.id, query = %query, "Handling snapmap command");

    let point = match geocoding.resolve(query).await {
        Ok(Some(point)) => point,
        Ok(None) => {
            bot.send_message(msg.chat.id, t_lang("location-not-found", language_code))
                .await?;
            return Ok(());
        }
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Geocoding failed");
            bot.send_message(msg.chat.id, t_lang("snapmap-failed", language_code))
                .await?;
            return Ok(());
        }
    };

    let snaps = match snap_map.fetch_snaps(point, TileSetType::Heat).await {
        Ok(snaps) if snaps.is_empty() => {
            bot.send_message(msg.chat.id, t_lang("no-snaps-found", language_code))
                .await?;
            return Ok(());
        }
        Ok(snaps) => snaps,
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Snap feed fetch failed");
            bot.send_message(msg.chat.id, t_lang("snapmap-failed", language_code))
                .await?;
            return Ok(());
        }
    };

    info!(user_id = %user.id, snap_count = snaps.len(), "Opening pagination session");

    // The session id is derived from the invoking message, so control
    // ids stay unique across concurrent invocations
    let session_id = format!("{}:{}", msg.chat.id.0, msg.id.0);
    let (next_control_id, clear_control_id) = PaginationSession::control_ids(&session_id);

    let view = SnapView::at(&snaps, 0);
    let media_url = match reqwest::Url::parse(&view.media_url) {
        Ok(url) => url,
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Snap media URL is malformed");
            bot.send_message(msg.chat.id, t_lang("snapmap-failed", language_code))
                .await?;
            return Ok(());
        }
    };

    let caption = format_snap_caption(&view, language_code);
    let keyboard = create_pagination_keyboard(
        view.has_next,
        &next_control_id,
        &clear_control_id,
        language_code,
    );

    let sent_message = match bot
        .send_video(msg.chat.id, InputFile::url(media_url))
        .caption(caption)
        .reply_markup(keyboard)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Failed to send initial snap message");
            bot.send_message(msg.chat.id, t_lang("snapmap-failed", language_code))
                .await?;
            return Ok(());
        }
    };

    let session = PaginationSession::new(
        &session_id,
        snaps,
        user.id,
        msg.chat.id,
        sent_message.id,
    );
    sessions.register(bot.clone(), session_id, session);

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    geocoding: Arc<GeocodingClient>,
    snap_map: Arc<SnapMapClient>,
    sessions: Arc<SessionManager>,
) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    // Handle /start command
    if text == "/start" {
        let welcome_message = format!(
            "{}\n\n{}\n\n{}\n{}\n{}",
            t_lang("welcome-title", language_code),
            t_lang("welcome-description", language_code),
            t_lang("welcome-commands", language_code),
            t_lang("welcome-snapmap", language_code),
            t_lang("welcome-help", language_code)
        );
        bot.send_message(msg.chat.id, welcome_message).await?;
    }
    // Handle /help command
    else if text == "/help" {
        let help_message = vec![
            t_lang("help-title", language_code),
            t_lang("help-description", language_code),
            t_lang("help-step1", language_code),
            t_lang("help-step2", language_code),
            t_lang("help-step3", language_code),
            t_lang("help-step4", language_code),
            t_lang("help-idle", language_code),
            t_lang("help-commands", language_code),
        ]
        .join("\n\n");
        bot.send_message(msg.chat.id, help_message).await?;
    }
    // Handle /snapmap command
    else if text == "/snapmap" || text.starts_with("/snapmap ") {
        let query = text["/snapmap".len()..].trim();
        handle_snapmap_command(
            bot,
            msg,
            query,
            geocoding,
            snap_map,
            sessions,
            language_code,
        )
        .await?;
    }
    // Handle regular text messages
    else {
        bot.send_message(
            msg.chat.id,
            format!(
                "{} {}",
                t_lang("text-response", language_code),
                t_lang("text-tip", language_code)
            ),
        )
        .await?;
    }

    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    geocoding: Arc<GeocodingClient>,
    snap_map: Arc<SnapMapClient>,
    sessions: Arc<SessionManager>,
) -> Result<()> {
    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, geocoding, snap_map, sessions).await?;
    } else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
    }

    Ok(())
}
