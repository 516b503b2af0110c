//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! transcript and handles both atomic and streaming exchanges with the
//! server.

use futures::StreamExt;
use futures::stream::{self, Stream};

use crate::chat::config::ChatConfig;
use crate::client::{Client, EventStream};
use crate::error::Error;
use crate::sse::StreamEvent;
use crate::types::{ChatMessage, CompletionRequest, DEFAULT_MODEL, Usage};

/// A chat session that manages conversation state and server interactions.
///
/// The session owns the transcript: an append-only sequence of user and
/// assistant messages, cleared only by [`ChatSession::clear_history`]. After
/// a successful exchange the transcript ends with a user message followed by
/// the corresponding assistant message. If an exchange fails, the user
/// message is retained, so a transcript may legitimately end with an
/// unanswered user message.
///
/// Failures never surface as panics or `Err` values from the send methods;
/// they come back as human-readable error descriptions, leaving the session
/// usable.
pub struct ChatSession {
    client: Client,
    config: ChatConfig,
    transcript: Vec<ChatMessage>,
    usage_totals: Usage,
    last_turn_usage: Option<Usage>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The configured model override, if any.
    pub model: Option<String>,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// The sampling temperature.
    pub temperature: f32,
    /// The maximum tokens per response.
    pub max_tokens: u32,
    /// Whether streaming mode is active.
    pub streaming: bool,
    /// Total prompt tokens across all exchanges that reported usage.
    pub total_prompt_tokens: u64,
    /// Total completion tokens across all exchanges that reported usage.
    pub total_completion_tokens: u64,
    /// Total number of completed exchanges.
    pub total_requests: u64,
    /// Usage reported for the last exchange, if any.
    pub last_turn_usage: Option<Usage>,
}

/// State carried between polls of the lazy fragment sequence.
enum StreamState<'a> {
    /// The request has not been issued yet.
    Connect {
        session: &'a mut ChatSession,
        params: CompletionRequest,
    },
    /// Events are being drained from the transport.
    Streaming {
        session: &'a mut ChatSession,
        events: EventStream,
        accumulated: String,
    },
    /// The sequence has ended; nothing more to yield.
    Finished,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Client, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            transcript: Vec::new(),
            usage_totals: Usage::default(),
            last_turn_usage: None,
            request_count: 0,
        }
    }

    /// Probes the server's liveness endpoint.
    ///
    /// Returns true only when the server answers with a success status
    /// within the bounded window; any failure is reported as false.
    pub async fn health_check(&self) -> bool {
        self.client.health().await.is_ok()
    }

    /// Queries the models advertised by the server.
    ///
    /// Returns the empty vector on any failure.
    pub async fn list_models(&self) -> Vec<String> {
        match self.client.models().await {
            Ok(response) => response.ids(),
            Err(_) => Vec::new(),
        }
    }

    /// Sends a user message and returns the complete reply.
    ///
    /// The user message is appended to the transcript before the request is
    /// issued. On success the reply is appended as an assistant message and
    /// returned. On any failure the returned string is an error description
    /// and no assistant message is appended, leaving the user message
    /// unanswered at the end of the transcript.
    pub async fn send(&mut self, message: &str) -> String {
        self.transcript.push(ChatMessage::user(message));
        let params = self.request_params();

        match self.client.complete(params).await {
            Ok(response) => {
                let usage = response.usage;
                match response.into_text() {
                    Some(content) => {
                        self.record_exchange(usage);
                        self.transcript.push(ChatMessage::assistant(content.clone()));
                        content
                    }
                    None => Error::unknown("server response contained no choices").to_string(),
                }
            }
            Err(err) => err.to_string(),
        }
    }

    /// Sends a user message and returns a lazy sequence of reply fragments.
    ///
    /// The user message is appended immediately; the request is issued when
    /// the returned stream is first polled. Each non-empty content delta is
    /// yielded as it arrives. Malformed event lines are dropped and the
    /// stream keeps going. When the server signals completion (or the
    /// transport ends cleanly), the accumulated text is appended to the
    /// transcript as a single assistant message, if non-empty. If the
    /// request or the transport fails, the stream yields exactly one
    /// error-description fragment and terminates without appending.
    ///
    /// The sequence is finite and not restartable; each call opens a new
    /// transport stream. Dropping the stream early closes the transport.
    pub fn send_stream<'a>(&'a mut self, message: &str) -> impl Stream<Item = String> + 'a {
        self.transcript.push(ChatMessage::user(message));
        let params = self.request_params();

        stream::unfold(
            StreamState::Connect {
                session: self,
                params,
            },
            |mut state| async move {
                loop {
                    match state {
                        StreamState::Connect { session, params } => {
                            match session.client.stream(params).await {
                                Ok(events) => {
                                    state = StreamState::Streaming {
                                        session,
                                        events,
                                        accumulated: String::new(),
                                    };
                                }
                                Err(err) => {
                                    return Some((err.to_string(), StreamState::Finished));
                                }
                            }
                        }
                        StreamState::Streaming {
                            session,
                            mut events,
                            mut accumulated,
                        } => match events.next().await {
                            Some(Ok(StreamEvent::Chunk(chunk))) => {
                                if let Some(text) = chunk.content() {
                                    accumulated.push_str(text);
                                    let fragment = text.to_string();
                                    return Some((
                                        fragment,
                                        StreamState::Streaming {
                                            session,
                                            events,
                                            accumulated,
                                        },
                                    ));
                                }
                                // Role announcements and finish chunks carry
                                // no text; keep reading.
                                state = StreamState::Streaming {
                                    session,
                                    events,
                                    accumulated,
                                };
                            }
                            Some(Ok(StreamEvent::Done)) | None => {
                                session.finish_stream(accumulated);
                                return None;
                            }
                            Some(Err(err)) if err.is_serialization() => {
                                // Malformed event line; drop the fragment and
                                // keep the stream alive.
                                state = StreamState::Streaming {
                                    session,
                                    events,
                                    accumulated,
                                };
                            }
                            Some(Err(err)) => {
                                return Some((err.to_string(), StreamState::Finished));
                            }
                        },
                        StreamState::Finished => return None,
                    }
                }
            },
        )
    }

    /// Clears the conversation history.
    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    /// Returns the conversation transcript, oldest message first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = Some(model.into());
    }

    /// Returns the configured model override, if any.
    pub fn model(&self) -> Option<&str> {
        self.config.model.as_deref()
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.config.temperature = temperature;
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.config.temperature
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.config.max_tokens = max_tokens;
    }

    /// Sets whether replies are streamed.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.config.streaming = streaming;
    }

    /// Returns whether replies are streamed.
    pub fn streaming(&self) -> bool {
        self.config.streaming
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            streaming: self.config.streaming,
            total_prompt_tokens: self.usage_totals.prompt_tokens,
            total_completion_tokens: self.usage_totals.completion_tokens,
            total_requests: self.request_count,
            last_turn_usage: self.last_turn_usage,
        }
    }

    fn request_params(&self) -> CompletionRequest {
        let model = self
            .config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        CompletionRequest::new(model, self.transcript.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
    }

    fn record_exchange(&mut self, usage: Option<Usage>) {
        self.request_count = self.request_count.saturating_add(1);
        if let Some(usage) = usage {
            self.last_turn_usage = Some(usage);
            self.usage_totals = self.usage_totals + usage;
        }
    }

    fn finish_stream(&mut self, accumulated: String) {
        self.record_exchange(None);
        if !accumulated.is_empty() {
            self.transcript.push(ChatMessage::assistant(accumulated));
        }
    }
}
