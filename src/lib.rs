// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod render;
pub mod sse;
pub mod types;

mod observability;

// Re-exports
pub use client::{Client, DEFAULT_BASE_URL, EventStream};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use sse::{StreamEvent, process_sse};
pub use types::*;
