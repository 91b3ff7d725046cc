//! # teletask-channels
//!
//! Messaging platform integrations for Teletask.

pub mod telegram;
pub mod utils;
