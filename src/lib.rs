//! # Snap Map Telegram Bot
//!
//! A Telegram bot that geocodes a free-text location query and lets the
//! invoking user browse publicly shared snaps near that point, one at a
//! time, through a short-lived interactive message.

pub mod bot;
pub mod config;
pub mod errors;
pub mod geocoding;
pub mod localization;
pub mod session;
pub mod session_manager;
pub mod snap_map;
