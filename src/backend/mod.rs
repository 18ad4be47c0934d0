pub mod client;
#[cfg(feature = "openai")]
pub(crate) mod media;
pub mod message;
#[cfg(feature = "openai")]
pub mod openai;
pub mod usage;
pub(crate) mod utils;

pub use client::{Choice, CompletionRequest, CompletionResponse, InferenceProvider, ToolCall};
pub use message::{ChatMessage, ChatRole, MediaFile};
#[cfg(feature = "openai")]
pub use openai::{Model as OpenAIModel, OpenAIClient, OpenAIConfig};
pub use usage::TokenUsage;
pub use utils::extract_json_from_markdown;
