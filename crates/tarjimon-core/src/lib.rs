//! # tarjimon-core
//!
//! Core types, traits, configuration, and error handling for the Tarjimon bot.

pub mod config;
pub mod error;
pub mod language;
pub mod message;
pub mod traits;
