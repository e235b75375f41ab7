use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{MessageId, UserId};

use snapmap::session::{PaginationSession, SessionControl};
use snapmap::session_manager::SessionManager;
use snapmap::snap_map::Snap;

fn test_bot() -> Bot {
    // Message deletion against this token fails and is swallowed by the
    // termination path; these tests only observe the registry
    Bot::new("123456:TEST_TOKEN")
}

fn sample_session(session_id: &str, snap_count: usize) -> PaginationSession {
    let snaps = (0..snap_count)
        .map(|i| Snap {
            title: format!("Snap {i}"),
            timestamp_millis: 1_650_000_000_000,
            media_url: format!("https://cdn.example.com/{i}.mp4"),
        })
        .collect();
    PaginationSession::new(session_id, snaps, UserId(1), ChatId(42), MessageId(100))
}

/// Registered sessions are retrievable until removed
#[tokio::test]
async fn test_register_and_remove() {
    let manager = Arc::new(SessionManager::new(Duration::from_secs(120)));

    manager.register(test_bot(), "42:1".to_string(), sample_session("42:1", 3));
    assert_eq!(manager.session_count(), 1);
    assert!(manager.get("42:1").is_some());
    assert!(manager.get("42:2").is_none());

    // First removal wins, the second caller gets nothing
    assert!(manager.remove("42:1").is_some());
    assert!(manager.remove("42:1").is_none());
    assert_eq!(manager.session_count(), 0);
}

/// An idle session expires and leaves the registry on its own
#[tokio::test]
async fn test_idle_session_expires() {
    let manager = Arc::new(SessionManager::new(Duration::from_millis(50)));

    manager.register(test_bot(), "42:1".to_string(), sample_session("42:1", 3));
    assert_eq!(manager.session_count(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(manager.session_count(), 0);
}

/// A qualifying interaction pushes the idle deadline back
#[tokio::test]
async fn test_touch_delays_expiry() {
    let manager = Arc::new(SessionManager::new(Duration::from_millis(300)));

    manager.register(test_bot(), "42:1".to_string(), sample_session("42:1", 3));
    let handle = manager.get("42:1").unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.lock().await.touch();

    // Original deadline has passed, but the touch restarted the window
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(manager.session_count(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(manager.session_count(), 0);
}

/// An explicit clear before the deadline leaves nothing for the watchdog
#[tokio::test]
async fn test_clear_before_expiry() {
    let manager = Arc::new(SessionManager::new(Duration::from_millis(100)));

    manager.register(test_bot(), "42:1".to_string(), sample_session("42:1", 3));
    assert!(manager.remove("42:1").is_some());
    assert_eq!(manager.session_count(), 0);

    // The watchdog wakes up after the deadline and finds nothing to do
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(manager.session_count(), 0);
}

/// Independent sessions expire independently
#[tokio::test]
async fn test_sessions_are_independent() {
    let manager = Arc::new(SessionManager::new(Duration::from_millis(200)));

    manager.register(test_bot(), "42:1".to_string(), sample_session("42:1", 2));
    manager.register(test_bot(), "43:1".to_string(), sample_session("43:1", 2));
    assert_eq!(manager.session_count(), 2);

    let kept = manager.get("43:1").unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    kept.lock().await.touch();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(manager.get("42:1").is_none());
    assert!(manager.get("43:1").is_some());
}

/// Transitions drive the cursor exactly as the controls allow
#[tokio::test]
async fn test_full_session_lifecycle() -> anyhow::Result<()> {
    let manager = Arc::new(SessionManager::new(Duration::from_secs(120)));
    manager.register(test_bot(), "42:7".to_string(), sample_session("42:7", 3));

    let handle = manager.get("42:7").unwrap();
    {
        let mut session = handle.lock().await;

        // Initial state: first snap, next offered
        assert_eq!(session.cursor(), 0);
        assert!(session.current_view().has_next);

        // Qualifying next presses advance the cursor
        assert_eq!(
            session.match_control(UserId(1), "next42:7"),
            Some(SessionControl::Next)
        );
        assert!(session.advance());
        assert!(session.advance());
        assert_eq!(session.cursor(), 2);

        // Last snap: no next control, stale presses are no-ops
        assert!(!session.current_view().has_next);
        assert!(!session.advance());
        assert_eq!(session.cursor(), 2);

        // A foreign user cannot clear the session
        assert_eq!(session.match_control(UserId(99), "clear42:7"), None);
    }

    // Explicit clear terminates exactly once
    assert!(manager.remove("42:7").is_some());
    assert!(manager.remove("42:7").is_none());

    Ok(())
}
