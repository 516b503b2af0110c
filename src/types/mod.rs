// Public modules
pub mod chat_message;
pub mod completion_chunk;
pub mod completion_request;
pub mod completion_response;
pub mod model_info;
pub mod model_list_response;
pub mod usage;

// Re-exports
pub use chat_message::{ChatMessage, Role};
pub use completion_chunk::{ChunkChoice, ChunkDelta, CompletionChunk};
pub use completion_request::{
    CompletionRequest, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
pub use completion_response::{CompletionChoice, CompletionResponse};
pub use model_info::ModelInfo;
pub use model_list_response::ModelListResponse;
pub use usage::Usage;
