//! Schema-constrained requests to the model and parsing of its replies.

mod parse;
mod receipt;

pub use parse::parse_response;
pub use receipt::{RECEIPT_INSTRUCTIONS, Receipt, ReceiptItem};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::backend::{
    ChatMessage, CompletionRequest, InferenceProvider, MediaFile, TokenUsage,
    extract_json_from_markdown,
};
use crate::error::{RExpenseError, Result};
use crate::ledger::ExpenseRecord;
use crate::model::StructuredOutput;
use crate::schema::{ToolChoice, ToolSchema};

/// What the model did with a request.
///
/// Whether a tool gets called is the model's decision and may differ
/// between identical requests, so both branches must be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    PlainText(String),
    /// `arguments` has been decoded and checked against the tool's schema
    ToolInvocation { name: String, arguments: Value },
}

/// A parsed reply together with its (opaque) token usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub outcome: ExtractionOutcome,
    pub usage: Option<TokenUsage>,
}

/// Everything sent for one extraction: instructions, user content, and the
/// tools on offer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub system: String,
    pub user: String,
    pub media: Vec<MediaFile>,
    pub tools: Vec<ToolSchema>,
    pub tool_choice: ToolChoice,
}

impl ExtractionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            media: Vec::new(),
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }

    pub fn image(mut self, media: MediaFile) -> Self {
        self.media.push(media);
        self
    }

    pub fn tool(mut self, tool: ToolSchema) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !self.system.is_empty() {
            messages.push(ChatMessage::system(self.system.clone()));
        }
        messages.push(ChatMessage::user_with_media(
            self.user.clone(),
            self.media.clone(),
        ));
        messages
    }

    fn to_completion_request(&self) -> Result<CompletionRequest> {
        if let ToolChoice::Function(name) = &self.tool_choice
            && !self.tools.iter().any(|t| &t.name == name)
        {
            return Err(RExpenseError::Config(format!(
                "forced tool '{}' is not among the offered tools",
                name
            )));
        }
        Ok(CompletionRequest::new(self.messages())
            .tools(self.tools.clone(), self.tool_choice.clone()))
    }
}

/// Builds requests for an [`InferenceProvider`] and parses the replies.
///
/// The provider is passed in explicitly, so any implementation (the hosted
/// client, a proxy, a canned test double) can stand behind it.
pub struct Extractor<P> {
    provider: P,
}

impl<P: InferenceProvider> Extractor<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send `request` and return either the model's text or its tool call.
    #[instrument(
        name = "extract",
        skip(self, request),
        fields(
            provider = self.provider.name(),
            tools = request.tools.len(),
            images = request.media.len()
        )
    )]
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<Extraction> {
        let completion = self
            .provider
            .complete(&request.to_completion_request()?)
            .await?;
        let extraction = parse_response(completion, &request.tools)?;
        match &extraction.outcome {
            ExtractionOutcome::PlainText(text) => {
                debug!(text_len = text.len(), "Model answered with text")
            }
            ExtractionOutcome::ToolInvocation { name, .. } => {
                debug!(tool = %name, "Model invoked a tool")
            }
        }
        Ok(extraction)
    }

    /// Plain text completion, no tools offered.
    #[instrument(skip(self, system, user, media), fields(provider = self.provider.name()))]
    pub async fn generate_text(
        &self,
        system: &str,
        user: &str,
        media: &[MediaFile],
    ) -> Result<String> {
        let mut request = ExtractionRequest::new(system, user);
        request.media = media.to_vec();
        match self.extract(&request).await?.outcome {
            ExtractionOutcome::PlainText(text) => Ok(text),
            ExtractionOutcome::ToolInvocation { name, .. } => Err(RExpenseError::malformed(
                format!("model invoked tool '{}' although none was offered", name),
            )),
        }
    }

    /// JSON-mode completion.
    ///
    /// The provider requires the instructions to mention JSON. Replies
    /// wrapped in a fenced code block are unwrapped before parsing.
    #[instrument(skip(self, system, user, media), fields(provider = self.provider.name()))]
    pub async fn generate_json(
        &self,
        system: &str,
        user: &str,
        media: &[MediaFile],
    ) -> Result<Value> {
        let mut request = ExtractionRequest::new(system, user);
        request.media = media.to_vec();
        let completion = self
            .provider
            .complete(&request.to_completion_request()?.json_mode())
            .await?;

        let text = match parse_response(completion, &[])?.outcome {
            ExtractionOutcome::PlainText(text) => text,
            ExtractionOutcome::ToolInvocation { name, .. } => {
                return Err(RExpenseError::malformed(format!(
                    "model invoked tool '{}' in JSON mode",
                    name
                )));
            }
        };

        let json = extract_json_from_markdown(&text);
        serde_json::from_str(&json).map_err(|e| {
            warn!(error = %e, content = %text, "Model output is not valid JSON");
            RExpenseError::malformed(format!("output is not valid JSON: {}", e))
        })
    }

    /// Force the tool described by `T` and decode its arguments into `T`.
    ///
    /// Deserialization and `T::validate` failures are malformed responses.
    #[instrument(
        skip(self, system, user, media),
        fields(type_name = std::any::type_name::<T>(), provider = self.provider.name())
    )]
    pub async fn extract_as<T: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
        media: &[MediaFile],
    ) -> Result<T> {
        let tool = ToolSchema::for_type::<T>();
        let tool_name = tool.name.clone();
        let mut request = ExtractionRequest::new(system, user)
            .tool(tool)
            .tool_choice(ToolChoice::Function(tool_name.clone()));
        request.media = media.to_vec();

        let arguments = match self.extract(&request).await?.outcome {
            ExtractionOutcome::ToolInvocation { arguments, .. } => arguments,
            ExtractionOutcome::PlainText(text) => {
                warn!(text_len = text.len(), "Model ignored the forced tool");
                return Err(RExpenseError::malformed(format!(
                    "expected a call to '{}', got text: {}",
                    tool_name, text
                )));
            }
        };

        let value: T = serde_json::from_value(arguments).map_err(|e| {
            RExpenseError::malformed(format!("arguments for '{}': {}", tool_name, e))
        })?;
        value.validate().map_err(|e| match e {
            RExpenseError::MalformedResponse(_) => e,
            other => RExpenseError::malformed(other.to_string()),
        })?;
        info!(tool = %tool_name, "Extracted structured output");
        Ok(value)
    }

    /// Itemize a receipt image into ledger records, one per line item.
    pub async fn extract_receipt(&self, image: MediaFile) -> Result<Vec<ExpenseRecord>> {
        let receipt: Receipt = self
            .extract_as(
                RECEIPT_INSTRUCTIONS,
                "Extract the purchase details from this receipt.",
                &[image],
            )
            .await?;
        receipt.into_records()
    }
}
