//! UI Builder module for creating keyboards and formatting snap captions

use chrono::DateTime;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import session view type
use crate::session::SnapView;

/// Format the page-position footer, e.g. "1/3 snaps"
pub fn format_snap_footer(position: usize, total: usize, language_code: Option<&str>) -> String {
    t_args_lang(
        "snap-footer",
        &[
            ("position", &position.to_string()),
            ("total", &total.to_string()),
        ],
        language_code,
    )
}

/// Format the caption of the owned message: title, capture time and the
/// page-position footer
pub fn format_snap_caption(view: &SnapView, language_code: Option<&str>) -> String {
    let title = if view.title.is_empty() {
        t_lang("snap-untitled", language_code)
    } else {
        view.title.clone()
    };

    let timestamp = DateTime::from_timestamp_millis(view.timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();

    format!(
        "{}\n{}\n\n{}",
        title,
        timestamp,
        format_snap_footer(view.position, view.total, language_code)
    )
}

/// Create the inline keyboard for a pagination state. The "next" button
/// is present only while further snaps remain; "clear" is always offered.
pub fn create_pagination_keyboard(
    has_next: bool,
    next_control_id: &str,
    clear_control_id: &str,
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut row = Vec::new();

    if has_next {
        row.push(InlineKeyboardButton::callback(
            t_lang("button-next", language_code),
            next_control_id.to_string(),
        ));
    }
    row.push(InlineKeyboardButton::callback(
        t_lang("button-clear", language_code),
        clear_control_id.to_string(),
    ));

    InlineKeyboardMarkup::new(vec![row])
}
