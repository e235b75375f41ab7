//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{InputFile, InputMedia, InputMediaVideo};
use tracing::{debug, error, info};

// Import session types
use crate::session::{PaginationSession, SessionControl, SnapView};
use crate::session_manager::{delete_session_message, SessionManager};

// Import UI builder functions
use super::ui_builder::{create_pagination_keyboard, format_snap_caption};

/// Re-render the owned message in place for a new cursor position. The
/// message identity stays the same; only its media, caption and keyboard
/// change.
async fn render_snap_view(
    bot: &Bot,
    session: &PaginationSession,
    view: &SnapView,
    language_code: Option<&str>,
) -> Result<()> {
    let media_url = reqwest::Url::parse(&view.media_url)?;
    let caption = format_snap_caption(view, language_code);
    let keyboard = create_pagination_keyboard(
        view.has_next,
        session.next_control_id(),
        session.clear_control_id(),
        language_code,
    );

    let media = InputMediaVideo::new(InputFile::url(media_url)).caption(caption);
    bot.edit_message_media(
        session.chat_id(),
        session.message_id(),
        InputMedia::Video(media),
    )
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

/// Handle callback queries from inline keyboards.
///
/// Only the two controls owned by a live session qualify, and only when
/// pressed by the session's invoker. Everything else is ignored without
/// state change or reply.
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    sessions: Arc<SessionManager>,
) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    debug!(user_id = %q.from.id, data = %data, "Received callback query from user");

    // Control ids carry the owning session id as their suffix
    let session_id = data
        .strip_prefix("next")
        .or_else(|| data.strip_prefix("clear"));

    if let Some(session_id) = session_id {
        if let Some(handle) = sessions.get(session_id) {
            let mut session = handle.lock().await;
            let language_code = q.from.language_code.as_deref();

            match session.match_control(q.from.id, data) {
                Some(SessionControl::Next) => {
                    session.touch();
                    if let Some(view) = session.next_view() {
                        // Commit the advance only once the edit succeeded,
                        // so a failed render leaves the session in its
                        // prior state
                        match render_snap_view(&bot, &session, &view, language_code).await {
                            Ok(()) => {
                                session.advance();
                                debug!(
                                    user_id = %q.from.id,
                                    cursor = session.cursor(),
                                    "Advanced pagination session"
                                );
                            }
                            Err(e) => {
                                error!(user_id = %q.from.id, error = %e, "Failed to edit snap message")
                            }
                        }
                    }
                    // No "next" control is offered on the last snap, so a
                    // stale press lands here and is ignored
                }
                Some(SessionControl::Clear) => {
                    drop(session);
                    if sessions.remove(session_id).is_some() {
                        info!(user_id = %q.from.id, session_id = %session_id, "Pagination session cleared");
                        let (chat_id, message_id) = {
                            let session = handle.lock().await;
                            (session.chat_id(), session.message_id())
                        };
                        delete_session_message(&bot, chat_id, message_id).await;
                    }
                }
                None => {
                    // Wrong user or a foreign control id: no state change,
                    // no reply
                    debug!(user_id = %q.from.id, "Ignoring non-qualifying interaction");
                }
            }
        } else {
            debug!(user_id = %q.from.id, "Ignoring control of a terminated session");
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
