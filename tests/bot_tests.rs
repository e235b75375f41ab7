use snapmap::bot::{create_pagination_keyboard, format_snap_caption, format_snap_footer};
use snapmap::config::SnapMapConfig;
use snapmap::errors::SnapMapError;
use snapmap::localization::init_localization;
use snapmap::session::{PaginationSession, SnapView};
use snapmap::snap_map::{Snap, TileSetType};
use teloxide::types::InlineKeyboardButtonKind;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() {
        // Initialize localization if not already done
        let _ = init_localization();
    }

    fn sample_snaps(count: usize) -> Vec<Snap> {
        (0..count)
            .map(|i| Snap {
                title: format!("Snap {i}"),
                timestamp_millis: 1_650_000_000_000 + i as i64,
                media_url: format!("https://cdn.example.com/{i}.mp4"),
            })
            .collect()
    }

    /// Test pagination keyboard while further snaps remain
    #[test]
    fn test_keyboard_with_next_control() {
        setup_localization();

        let keyboard = create_pagination_keyboard(true, "next1:2", "clear1:2", Some("en"));
        let row = &keyboard.inline_keyboard[0];

        assert_eq!(row.len(), 2);
        assert_eq!(row[0].text, "Next");
        assert_eq!(row[1].text, "Clear");
        assert_eq!(
            row[0].kind,
            InlineKeyboardButtonKind::CallbackData("next1:2".to_string())
        );
        assert_eq!(
            row[1].kind,
            InlineKeyboardButtonKind::CallbackData("clear1:2".to_string())
        );
    }

    /// Test pagination keyboard on the last snap
    #[test]
    fn test_keyboard_without_next_control() {
        setup_localization();

        let keyboard = create_pagination_keyboard(false, "next1:2", "clear1:2", Some("en"));
        let row = &keyboard.inline_keyboard[0];

        assert_eq!(row.len(), 1);
        assert_eq!(row[0].text, "Clear");
    }

    /// Test localized button labels
    #[test]
    fn test_keyboard_localized_labels() {
        setup_localization();

        let keyboard = create_pagination_keyboard(true, "next1:2", "clear1:2", Some("fr"));
        let row = &keyboard.inline_keyboard[0];

        assert_eq!(row[0].text, "Suivant");
        assert_eq!(row[1].text, "Effacer");
    }

    /// Test page-position footer formatting
    #[test]
    fn test_footer_formatting() {
        setup_localization();

        assert_eq!(format_snap_footer(1, 3, Some("en")), "1/3 snaps");
        assert_eq!(format_snap_footer(3, 3, Some("en")), "3/3 snaps");
        assert_eq!(format_snap_footer(2, 5, None), "2/5 snaps");
    }

    /// Test snap caption contents
    #[test]
    fn test_caption_formatting() {
        setup_localization();

        let snaps = sample_snaps(3);
        let view = SnapView::at(&snaps, 0);
        let caption = format_snap_caption(&view, Some("en"));

        assert!(caption.contains("Snap 0"));
        assert!(caption.contains("2022-04-15"));
        assert!(caption.contains("UTC"));
        assert!(caption.ends_with("1/3 snaps"));
    }

    /// Test caption fallback for snaps without a title
    #[test]
    fn test_caption_untitled_fallback() {
        setup_localization();

        let view = SnapView {
            title: String::new(),
            timestamp_millis: 1_650_000_000_000,
            media_url: "https://cdn.example.com/x.mp4".to_string(),
            position: 1,
            total: 1,
            has_next: false,
        };

        let caption = format_snap_caption(&view, Some("en"));
        assert!(caption.contains("Untitled snap"));
    }

    /// Test error message formatting
    #[test]
    fn test_error_message_formatting() {
        let geocoding_error = SnapMapError::Geocoding("connection refused".to_string());
        assert_eq!(
            format!("{}", geocoding_error),
            "Geocoding error: connection refused"
        );

        let unavailable = SnapMapError::TileSetUnavailable(TileSetType::Heat);
        assert_eq!(
            format!("{}", unavailable),
            "No tile set available for type HEAT"
        );

        let playlist_error = SnapMapError::Playlist("decode failure".to_string());
        assert_eq!(format!("{}", playlist_error), "Playlist error: decode failure");
    }

    /// Test configuration defaults are reasonable
    #[test]
    fn test_config_defaults() {
        let config = SnapMapConfig::default();

        assert!(config.radius_meters > 1_000.0);
        assert!(config.radius_meters < 100_000.0);
        assert!(config.zoom_level > 0.0);
        assert!(config.zoom_level < 20.0);
        assert_eq!(config.idle_timeout.as_secs(), 120);
    }

    /// Test control id derivation from the session id
    #[test]
    fn test_control_ids_are_invocation_scoped() {
        let (next_a, clear_a) = PaginationSession::control_ids("10:1");
        let (next_b, clear_b) = PaginationSession::control_ids("10:2");

        assert_eq!(next_a, "next10:1");
        assert_eq!(clear_a, "clear10:1");
        // Concurrent invocations never share control ids
        assert_ne!(next_a, next_b);
        assert_ne!(clear_a, clear_b);
    }
}
