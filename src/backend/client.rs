use async_trait::async_trait;

use crate::backend::{ChatMessage, TokenUsage};
use crate::error::Result;
use crate::schema::{ToolChoice, ToolSchema};

/// A provider-neutral chat request: messages, the tools on offer, and
/// how the model may use them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSchema>,
    pub tool_choice: ToolChoice,
    /// Ask the provider to constrain the reply to a JSON object
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
            json_mode: false,
        }
    }

    pub fn tools(mut self, tools: Vec<ToolSchema>, tool_choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = tool_choice;
        self
    }

    pub fn json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// A tool invocation as returned by the provider. `arguments` is the raw
/// JSON text and has not been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: Option<String>,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            tool_calls: vec![call],
            finish_reason: Some("tool_calls".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<TokenUsage>,
}

/// A remote inference provider.
///
/// This is the seam between the extraction logic and the network: the
/// production implementation is [`OpenAIClient`](crate::OpenAIClient), and
/// tests substitute a canned implementation. Implementations make exactly
/// one remote call per `complete` and do not retry; the remote side is
/// nondeterministic, so identical requests may produce different replies.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name used in logs and error messages
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}

#[async_trait]
impl<P: InferenceProvider + ?Sized> InferenceProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        (**self).complete(request).await
    }
}
