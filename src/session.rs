//! # Pagination Session Module
//!
//! State for one user's paginated browsing of a snap sequence, tied to
//! one interactive message. The session itself is a pure state machine:
//! it classifies incoming interactions, moves the cursor and describes
//! what the owned message should show. All Telegram I/O happens in the
//! bot handlers and the session manager.

use std::time::Instant;

use teloxide::types::{ChatId, MessageId, UserId};

use crate::snap_map::Snap;

/// Control kinds a qualifying interaction can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Next,
    Clear,
}

/// What the owned message shows for one cursor position
#[derive(Debug, Clone, PartialEq)]
pub struct SnapView {
    pub title: String,
    pub timestamp_millis: i64,
    pub media_url: String,
    /// 1-based position in the sequence
    pub position: usize,
    pub total: usize,
    /// Whether a "next" control is offered after this view
    pub has_next: bool,
}

impl SnapView {
    /// View of `snaps[cursor]` within the whole sequence
    pub fn at(snaps: &[Snap], cursor: usize) -> SnapView {
        let snap = &snaps[cursor];
        SnapView {
            title: snap.title.clone(),
            timestamp_millis: snap.timestamp_millis,
            media_url: snap.media_url.clone(),
            position: cursor + 1,
            total: snaps.len(),
            has_next: cursor + 1 < snaps.len(),
        }
    }
}

/// State for one pagination session.
///
/// Created only from a non-empty snap sequence; empty feeds short-circuit
/// before any session exists. The cursor is 0-indexed, only ever moves
/// forward and stays within the sequence.
#[derive(Debug)]
pub struct PaginationSession {
    snaps: Vec<Snap>,
    cursor: usize,
    invoker: UserId,
    chat_id: ChatId,
    message_id: MessageId,
    next_control_id: String,
    clear_control_id: String,
    last_event: Instant,
}

impl PaginationSession {
    /// Control ids owned by the session with the given id. The session id
    /// is derived from the invoking message, so the ids are unique across
    /// concurrent invocations.
    pub fn control_ids(session_id: &str) -> (String, String) {
        (format!("next{session_id}"), format!("clear{session_id}"))
    }

    pub fn new(
        session_id: &str,
        snaps: Vec<Snap>,
        invoker: UserId,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Self {
        debug_assert!(!snaps.is_empty(), "sessions require a non-empty snap sequence");
        let (next_control_id, clear_control_id) = Self::control_ids(session_id);
        Self {
            snaps,
            cursor: 0,
            invoker,
            chat_id,
            message_id,
            next_control_id,
            clear_control_id,
            last_event: Instant::now(),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// The one message this session owns and mutates in place
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next_control_id(&self) -> &str {
        &self.next_control_id
    }

    pub fn clear_control_id(&self) -> &str {
        &self.clear_control_id
    }

    /// Classify an incoming interaction. Anything from another user or
    /// with a control id this session does not own is non-qualifying and
    /// yields `None`.
    pub fn match_control(&self, user: UserId, data: &str) -> Option<SessionControl> {
        if user != self.invoker {
            return None;
        }
        if data == self.next_control_id {
            Some(SessionControl::Next)
        } else if data == self.clear_control_id {
            Some(SessionControl::Clear)
        } else {
            None
        }
    }

    /// View of the snap under the cursor
    pub fn current_view(&self) -> SnapView {
        SnapView::at(&self.snaps, self.cursor)
    }

    /// View of the snap after the cursor, if one exists. Used to render
    /// before committing an advance so a failed edit leaves the session
    /// in its prior state.
    pub fn next_view(&self) -> Option<SnapView> {
        if self.cursor + 1 < self.snaps.len() {
            Some(SnapView::at(&self.snaps, self.cursor + 1))
        } else {
            None
        }
    }

    /// Move the cursor forward by one. Returns `false` at the end of the
    /// sequence; no "next" control is offered there, so a stale press is
    /// ignored rather than rejected.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 >= self.snaps.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Record a qualifying interaction, restarting the idle window
    pub fn touch(&mut self) {
        self.last_event = Instant::now();
    }

    /// Time of the last qualifying interaction, or of creation if none
    /// occurred yet
    pub fn last_event(&self) -> Instant {
        self.last_event
    }
}
