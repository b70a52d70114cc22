//! Discord bot integration.
//!
//! This module connects the forwarding bridge and the command surface to
//! the Discord gateway.

pub mod client;
pub mod commands;
pub mod handler;
pub mod platform;

pub use client::DiscordBotBuilder;
pub use commands::CommandHandler;
