//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module handles parsing of the SSE stream emitted by OpenAI-compatible
//! completion endpoints, converting raw byte streams into structured
//! [`StreamEvent`] values. Each event is a `data:` line carrying either a JSON
//! completion chunk or the `[DONE]` sentinel.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability;
use crate::types::CompletionChunk;

/// One parsed event from a streaming completion response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// An incremental completion chunk.
    Chunk(CompletionChunk),

    /// The `[DONE]` sentinel; no further chunks follow.
    Done,
}

/// Process a stream of bytes into a stream of completion events.
///
/// This function takes a byte stream from an HTTP response and converts it
/// into parsed [`StreamEvent`]s, handling SSE framing, buffering across chunk
/// boundaries, and error conditions. A malformed `data:` payload yields an
/// `Err` item but does not terminate the stream; callers that favor partial
/// output over strict conformance can skip such items and keep reading.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<StreamEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => {
                            observability::STREAM_EVENTS.click();
                            if event.is_err() {
                                observability::STREAM_ERRORS.click();
                            }
                            return Some((event, (stream, buffer)));
                        }
                        // Comment or keep-alive block; consume and keep reading.
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                observability::STREAM_ERRORS.click();
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        observability::STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream; deliver a trailing buffered event if
                        // the server closed without a final blank line.
                        if !buffer.is_empty() {
                            buffer.push_str("\n\n");
                            if let Some((Some(event), remaining)) = extract_event(&buffer) {
                                return Some((event, (stream, remaining)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract a complete SSE event from a buffer string.
///
/// Events are delimited by blank lines. The outer `Option` reports whether a
/// complete block is buffered; the inner `Option` is `None` for blocks with no
/// `data:` payload (comments and keep-alives), which are consumed silently.
fn extract_event(buffer: &str) -> Option<(Option<Result<StreamEvent>>, String)> {
    let parts: Vec<&str> = buffer.splitn(2, "\n\n").collect();
    if parts.len() != 2 {
        return None;
    }
    let event_text = parts[0];
    let rest = parts[1].to_string();

    // Find the data payload; lines() tolerates \r\n line endings.
    let mut data = None;
    for line in event_text.lines() {
        if let Some(payload) = line.strip_prefix("data:") {
            data = Some(payload.trim());
        }
    }

    match data {
        Some("[DONE]") => Some((Some(Ok(StreamEvent::Done)), rest)),
        Some(json_str) => match serde_json::from_str::<CompletionChunk>(json_str) {
            Ok(chunk) => Some((Some(Ok(StreamEvent::Chunk(chunk))), rest)),
            Err(e) => Some((
                Some(Err(Error::serialization(
                    format!("Failed to parse event JSON: {e}"),
                    Some(Box::new(e)),
                ))),
                rest,
            )),
        },
        None => Some((None, rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn byte_stream(
        chunks: Vec<&'static [u8]>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin {
        Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from(c))),
        ))
    }

    async fn collect(data: Vec<&'static [u8]>) -> Vec<Result<StreamEvent>> {
        let sse_stream = process_sse(byte_stream(data));
        sse_stream.collect().await
    }

    fn fragment(event: &Result<StreamEvent>) -> Option<String> {
        match event {
            Ok(StreamEvent::Chunk(chunk)) => chunk.content().map(String::from),
            _ => None,
        }
    }

    #[tokio::test]
    async fn parse_content_chunk() {
        let events =
            collect(vec![b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n"]).await;

        assert_eq!(events.len(), 1);
        assert_eq!(fragment(&events[0]), Some("Hi".to_string()));
    }

    #[tokio::test]
    async fn parse_multiple_events() {
        let data: &[u8] = b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
                            data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
                            data: [DONE]\n\n";
        let events = collect(vec![data]).await;

        assert_eq!(events.len(), 3);
        assert_eq!(fragment(&events[0]), Some("Hel".to_string()));
        assert_eq!(fragment(&events[1]), Some("lo".to_string()));
        assert!(matches!(events[2], Ok(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn handle_event_split_across_chunks() {
        let events = collect(vec![
            b"data: {\"choices\":[{\"delta\":",
            b"{\"content\":\"Hi\"}}]}\n\n",
        ])
        .await;

        assert_eq!(events.len(), 1);
        assert_eq!(fragment(&events[0]), Some("Hi".to_string()));
    }

    #[tokio::test]
    async fn malformed_event_does_not_end_stream() {
        let data: &[u8] = b"data: {not json}\n\n\
                            data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n\
                            data: [DONE]\n\n";
        let events = collect(vec![data]).await;

        assert_eq!(events.len(), 3);
        assert!(events[0].as_ref().is_err_and(Error::is_serialization));
        assert_eq!(fragment(&events[1]), Some("ok".to_string()));
        assert!(matches!(events[2], Ok(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn comment_blocks_are_skipped() {
        let data: &[u8] = b": keep-alive\n\n\
                            data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n";
        let events = collect(vec![data]).await;

        assert_eq!(events.len(), 1);
        assert_eq!(fragment(&events[0]), Some("Hi".to_string()));
    }

    #[tokio::test]
    async fn trailing_event_without_final_blank_line() {
        let events =
            collect(vec![b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}"]).await;

        assert_eq!(events.len(), 1);
        assert_eq!(fragment(&events[0]), Some("Hi".to_string()));
    }

    #[tokio::test]
    async fn carriage_returns_are_trimmed() {
        let events = collect(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\r\n\ndata: [DONE]\r\n\n",
        ])
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(fragment(&events[0]), Some("Hi".to_string()));
        assert!(matches!(events[1], Ok(StreamEvent::Done)));
    }
}
