//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

use crate::types::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Command-line arguments for the vellum-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq)]
pub struct ChatArgs {
    /// Base URL of the completion server.
    #[arrrg(optional, "Server base URL (default: http://localhost:9998)", "URL")]
    pub url: Option<String>,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: ask the server)", "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Sampling temperature 0.0-2.0 (default: 0.7)", "TEMP")]
    pub temperature: Option<f32>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 1000)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable streaming responses.
    #[arrrg(flag, "Disable streaming responses")]
    pub no_stream: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

// `arrrg::CommandLine` requires `Eq`, but `ChatArgs` carries an `f32`
// (`temperature`) field which cannot derive `Eq`. `Eq` is a marker trait with
// no methods, so a manual impl satisfies the bound without changing behavior.
impl Eq for ChatArgs {}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to request; `None` sends the `"default"` sentinel.
    pub model: Option<String>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Whether replies are streamed incrementally.
    pub streaming: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: server default
    /// - Temperature: 0.7
    /// - Max tokens: 1000
    /// - Streaming: enabled
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            streaming: true,
            use_color: true,
        }
    }

    /// Sets the model to request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Disables streaming responses.
    pub fn without_streaming(mut self) -> Self {
        self.streaming = false;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model,
            temperature: args.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            streaming: !args.no_stream,
            use_color: !args.no_color,
        }
    }
}
