//! One-shot prompt runner for OpenAI-compatible completion servers.
//!
//! Sends a single prompt and prints the reply, streaming it by default.
//!
//! # Usage
//!
//! ```bash
//! # Prompt from the command line
//! vellum-prompt Tell me about the weather in Lisbon.
//!
//! # Prompt from stdin, non-streaming
//! echo "Summarize this file" | vellum-prompt --no-stream
//!
//! # Against a specific server and model
//! vellum-prompt --url http://localhost:8000 --model qwen-7b "Hello!"
//! ```

use std::io::{Read, Write};

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use futures::StreamExt;
use tokio::pin;

use vellum::chat::{ChatConfig, ChatSession};
use vellum::{Client, DEFAULT_BASE_URL};

/// Command-line arguments for the vellum-prompt tool.
#[derive(CommandLine, Debug, Default, PartialEq)]
struct Args {
    /// Base URL of the completion server.
    #[arrrg(optional, "Server base URL (default: http://localhost:9998)", "URL")]
    url: Option<String>,

    /// Model to use.
    #[arrrg(optional, "Model to use (default: server default)", "MODEL")]
    model: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Sampling temperature 0.0-2.0 (default: 0.7)", "TEMP")]
    temperature: Option<f32>,

    /// Disable streaming output.
    #[arrrg(flag, "Disable streaming output")]
    no_stream: bool,
}

// `arrrg::CommandLine` requires `Eq`, but `Args` carries an `f32`
// (`temperature`) field which cannot derive `Eq`. `Eq` is a marker trait with
// no methods, so a manual impl satisfies the bound without changing behavior.
impl Eq for Args {}

/// Main entry point for the vellum-prompt tool.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line_relaxed("vellum-prompt [OPTIONS] [PROMPT...]");

    let prompt = if free.is_empty() {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer.trim().to_string()
    } else {
        free.join(" ")
    };
    if prompt.is_empty() {
        eprintln!("No prompt given.");
        std::process::exit(2);
    }

    let url = args.url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let mut config = ChatConfig::new();
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if args.no_stream {
        config = config.without_streaming();
    }

    let client = Client::new(url.as_str())?;
    let mut session = ChatSession::new(client, config);

    if !session.health_check().await {
        eprintln!("Cannot reach the server at {url}. Make sure it is running.");
        std::process::exit(1);
    }

    if session.streaming() {
        let stream = session.send_stream(&prompt);
        pin!(stream);
        let mut stdout = std::io::stdout();
        while let Some(fragment) = stream.next().await {
            print!("{fragment}");
            let _ = stdout.flush();
        }
        println!();
    } else {
        println!("{}", session.send(&prompt).await);
    }

    Ok(())
}
