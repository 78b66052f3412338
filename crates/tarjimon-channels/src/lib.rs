//! # tarjimon-channels
//!
//! Messaging platform integrations for Tarjimon.

pub mod telegram;
pub mod utils;
