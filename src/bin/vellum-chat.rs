//! Interactive chat application for OpenAI-compatible completion servers.
//!
//! This binary provides a streaming REPL interface for chatting with a model
//! served by vLLM or any other server speaking the same API.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! vellum-chat
//!
//! # Point at a server and pick a model
//! vellum-chat --url http://localhost:8000 --model qwen-7b
//!
//! # Disable streaming and colors (useful for piping output)
//! vellum-chat --no-stream --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/history` - Show the conversation so far
//! - `/model <name>` - Change the model
//! - `/stream [on|off]` - Toggle streaming responses
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::pin;

use vellum::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use vellum::{ChatMessage, Client, DEFAULT_BASE_URL};

/// Main entry point for the vellum-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("vellum-chat [OPTIONS]");
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = Client::new(url.as_str())?;
    let mut session = ChatSession::new(client, config);

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    let mut renderer =
        PlainTextRenderer::with_color(use_color).with_interrupt(interrupted.clone());
    let mut rl = DefaultEditor::new()?;

    println!("vellum chat ({url})");
    renderer.print_info("Checking server health...");
    if !session.health_check().await {
        renderer.print_error(&format!(
            "Cannot reach the server at {url}. Make sure it is running."
        ));
        std::process::exit(1);
    }
    renderer.print_info("Server connected.");

    if session.model().is_none() {
        select_model(&mut session, &mut renderer, &mut rl).await;
    }

    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear_history();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::History => {
                            print_history(&mut renderer, session.transcript());
                        }
                        ChatCommand::Models => {
                            let models = session.list_models().await;
                            if models.is_empty() {
                                renderer.print_info("No models available.");
                            } else {
                                println!("    Available models:");
                                for model in models {
                                    println!("      - {}", model);
                                }
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            session.set_model(model_name.clone());
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::Stream(setting) => {
                            let streaming = setting.unwrap_or(!session.streaming());
                            session.set_streaming(streaming);
                            if streaming {
                                renderer.print_info("Streaming responses enabled.");
                            } else {
                                renderer.print_info("Streaming responses disabled.");
                            }
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(value);
                            renderer.print_info(&format!("temperature set to {:.2}", value));
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_tokens(value);
                            renderer.print_info(&format!("max_tokens set to {value}"));
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the server
                println!("Assistant:");
                if session.streaming() {
                    let stream = session.send_stream(line);
                    pin!(stream);
                    while let Some(fragment) = stream.next().await {
                        renderer.print_text(&fragment);
                        if renderer.should_interrupt() {
                            // Dropping the stream closes the transport.
                            renderer.print_interrupted();
                            break;
                        }
                    }
                } else {
                    let reply = session.send(line).await;
                    renderer.print_text(&reply);
                }
                renderer.finish_response();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Asks the server for its models and lets the user pick one.
///
/// Keeps the server-default model on an empty answer, a cancelled prompt, or
/// when the server advertises nothing.
async fn select_model(
    session: &mut ChatSession,
    renderer: &mut PlainTextRenderer,
    rl: &mut DefaultEditor,
) {
    let models = session.list_models().await;
    if models.is_empty() {
        renderer.print_info("No models advertised; using the server default.");
        return;
    }
    if models.len() == 1 {
        session.set_model(models[0].clone());
        renderer.print_info(&format!("Using model: {}", models[0]));
        return;
    }

    println!("Available models:");
    for (i, model) in models.iter().enumerate() {
        println!("  [{}] {}", i + 1, model);
    }

    loop {
        let prompt = format!(
            "Choose a model (1-{}) or press Enter for the default: ",
            models.len()
        );
        match rl.readline(&prompt) {
            Ok(choice) => {
                let choice = choice.trim();
                if choice.is_empty() {
                    return;
                }
                match choice.parse::<usize>() {
                    Ok(n) if (1..=models.len()).contains(&n) => {
                        session.set_model(models[n - 1].clone());
                        renderer.print_info(&format!("Model selected: {}", models[n - 1]));
                        return;
                    }
                    _ => renderer.print_error(&format!(
                        "Please choose a number between 1 and {}",
                        models.len()
                    )),
                }
            }
            Err(_) => {
                renderer.print_info("Selection cancelled; using the server default.");
                return;
            }
        }
    }
}

fn print_history(renderer: &mut PlainTextRenderer, transcript: &[ChatMessage]) {
    if transcript.is_empty() {
        renderer.print_info("No messages in the history.");
        return;
    }
    for (i, message) in transcript.iter().enumerate() {
        renderer.print_role(i + 1, message.role);
        println!("{}", message.content);
        println!();
    }
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    match stats.model {
        Some(ref model) => println!("      Model: {}", model),
        None => println!("      Model: (server default)"),
    }
    println!("      Messages: {}", stats.message_count);
    println!("      Temperature: {:.2}", stats.temperature);
    println!("      Max tokens: {}", stats.max_tokens);
    println!(
        "      Streaming: {}",
        if stats.streaming { "on" } else { "off" }
    );
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_completion_tokens, stats.total_requests
    );
    if let Some(usage) = stats.last_turn_usage {
        println!(
            "      Last turn tokens: {} in / {} out",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
}
