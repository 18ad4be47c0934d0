use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::backend::media::{MessageContent, build_message_content};
use crate::backend::utils::{
    check_response_status, handle_http_error, impl_client_builder_methods,
};
use crate::backend::{
    Choice, CompletionRequest, CompletionResponse, InferenceProvider, TokenUsage, ToolCall,
};
use crate::error::{ApiErrorKind, RExpenseError, Result};
use crate::schema::ToolChoice;

const PROVIDER: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI models with vision and tool-calling support.
///
/// Any other model name can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use rexpense::OpenAIModel;
/// use std::str::FromStr;
///
/// let model = OpenAIModel::from_str("gpt-4o-2024-08-06").unwrap();
/// assert_eq!(model, OpenAIModel::Custom("gpt-4o-2024-08-06".to_string()));
/// assert_eq!(OpenAIModel::from_string("gpt-4o"), OpenAIModel::Gpt4O);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    Gpt4O,
    Gpt4OMini,
    Gpt41,
    Gpt41Mini,
    /// Custom model name (new models or OpenAI-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4O => "gpt-4o",
            Model::Gpt4OMini => "gpt-4o-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Custom(name) => name,
        }
    }

    /// Known names map to their variant; anything else becomes `Custom`.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "gpt-4o" => Model::Gpt4O,
            "gpt-4o-mini" => Model::Gpt4OMini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            _ => Model::Custom(name),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the OpenAI client.
///
/// Passed explicitly into the client; nothing is read from process-wide
/// state after construction.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    /// Defaults to "https://api.openai.com/v1" if not set
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Model::Gpt4O,
            temperature: 0.0,
            max_tokens: None,
            timeout: None,
            base_url: None,
        }
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

/// Chat-completions client implementing [`InferenceProvider`].
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: reqwest::Client,
}

// Chat-completions wire format
#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<UsageInfo>,
    #[serde(default)]
    model: Option<String>,
}

fn tool_choice_value(choice: &ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Function(name) => json!({
            "type": "function",
            "function": { "name": name }
        }),
    }
}

fn build_request_body<'a>(
    config: &'a OpenAIConfig,
    request: &'a CompletionRequest,
) -> Result<ChatCompletionRequest<'a>> {
    let messages = request
        .messages
        .iter()
        .map(|msg| {
            Ok(WireMessage {
                role: msg.role.as_str(),
                content: build_message_content(msg, PROVIDER)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let tools: Vec<WireTool<'a>> = request
        .tools
        .iter()
        .map(|tool| WireTool {
            kind: "function",
            function: WireFunction {
                name: &tool.name,
                description: &tool.description,
                parameters: tool.parameters.to_json(),
            },
        })
        .collect();

    // tool_choice without tools is rejected by the API
    let tool_choice = (!tools.is_empty()).then(|| tool_choice_value(&request.tool_choice));
    let response_format = request
        .json_mode
        .then(|| json!({ "type": "json_object" }));

    Ok(ChatCompletionRequest {
        model: config.model.as_str(),
        messages,
        tools,
        tool_choice,
        response_format,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    })
}

fn convert_response(
    completion: ChatCompletionResponse,
    requested_model: &str,
) -> CompletionResponse {
    let model = completion
        .model
        .unwrap_or_else(|| requested_model.to_string());
    let usage = completion
        .usage
        .map(|u| TokenUsage::new(model, u.prompt_tokens, u.completion_tokens));

    let choices = completion
        .choices
        .into_iter()
        .map(|choice| Choice {
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
            finish_reason: choice.finish_reason,
        })
        .collect();

    CompletionResponse { choices, usage }
}

impl OpenAIClient {
    /// Create a client with the default model (gpt-4o) and temperature 0.
    ///
    /// ```no_run
    /// # use rexpense::{OpenAIClient, OpenAIModel};
    /// # fn example() -> rexpense::Result<()> {
    /// let client = OpenAIClient::new("sk-...")?
    ///     .model(OpenAIModel::Gpt4OMini)
    ///     .temperature(0.2);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "openai_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RExpenseError::api_error(
                PROVIDER,
                ApiErrorKind::AuthenticationFailed,
            ));
        }

        info!("Creating new OpenAI client");
        trace!("API key length: {}", api_key.len());
        Ok(Self::with_config(OpenAIConfig::new(api_key)))
    }

    /// Create a client from `OPENAI_API_KEY`, honouring `OPENAI_BASE_URL` when set.
    #[instrument(name = "openai_client_from_env")]
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| RExpenseError::api_error(PROVIDER, ApiErrorKind::AuthenticationFailed))?;
        let mut client = Self::new(api_key)?;
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            debug!(base_url = %base_url, "Using base URL from environment");
            client = client.base_url(base_url);
        }
        Ok(client)
    }

    /// Create a client from a fully specified configuration.
    pub fn with_config(config: OpenAIConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build reqwest client with timeout, using default");
            reqwest::Client::new()
        });
        debug!(model = %config.model.as_str(), "OpenAI client configured");
        Self { config, client }
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

impl_client_builder_methods! {
    client_type: OpenAIClient,
    model_type: Model,
    provider_name: PROVIDER
}

#[async_trait]
impl InferenceProvider for OpenAIClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(
        name = "openai_complete",
        skip(self, request),
        fields(
            model = %self.config.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            json_mode = request.json_mode
        )
    )]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = build_request_body(&self.config, request)?;
        let url = self.config.endpoint();

        debug!(url = %url, "Sending request to OpenAI API");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_http_error(e, PROVIDER))?;
        let response = check_response_status(response, PROVIDER).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response from OpenAI");
            RExpenseError::api_error(
                PROVIDER,
                ApiErrorKind::UnexpectedResponse {
                    details: e.to_string(),
                },
            )
        })?;
        debug!(choices = completion.choices.len(), "Received response from OpenAI");

        Ok(convert_response(completion, self.config.model.as_str()))
    }
}
