//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming text commands, `/snapmap` included
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates pagination keyboards and formats snap captions

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export utility functions that might be used elsewhere
pub use ui_builder::{create_pagination_keyboard, format_snap_caption, format_snap_footer};
