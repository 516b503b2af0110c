//! Chat application module for interactive conversations with a completion
//! server.
//!
//! This module provides a streaming chat layer built on top of the vellum
//! client library. It supports:
//!
//! - Streaming responses with incremental fragment delivery
//! - Slash commands for session control
//! - Configurable server address, model, and sampling parameters
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and server interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, SessionStats};
