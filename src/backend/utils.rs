#[cfg(feature = "openai")]
use tracing::error;

#[cfg(feature = "openai")]
use crate::error::Result;
use crate::error::{ApiErrorKind, RExpenseError};

/// Extract JSON from markdown code blocks if present, otherwise return the content as-is.
///
/// Models asked for JSON occasionally wrap it in ```json ... ``` fences.
pub fn extract_json_from_markdown(content: &str) -> String {
    let trimmed = content.trim();

    if trimmed.starts_with("```")
        && let Some(start_idx) = trimmed.find('\n')
    {
        let after_start = &trimmed[start_idx + 1..];
        if let Some(end_idx) = after_start.rfind("```") {
            return after_start[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}

/// Convert a reqwest error to an RExpenseError, handling timeouts specially.
#[cfg(feature = "openai")]
pub(crate) fn handle_http_error(e: reqwest::Error, provider_name: &str) -> RExpenseError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        RExpenseError::Timeout
    } else {
        RExpenseError::HttpError(e)
    }
}

/// Check HTTP response status and turn failures into a classified API error.
#[cfg(feature = "openai")]
pub(crate) async fn check_response_status(
    response: reqwest::Response,
    provider_name: &str,
) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(status_error(provider_name, status.as_u16(), &error_text));
    }
    Ok(response)
}

pub(crate) fn status_error(provider_name: &str, status: u16, body: &str) -> RExpenseError {
    RExpenseError::api_error(provider_name, ApiErrorKind::from_status(status, body))
}

/// Generates the chainable configuration setters shared by hosted clients.
///
/// The client type must have `config` (with `model`, `temperature`,
/// `max_tokens`, `timeout` and `base_url` fields) and `client: reqwest::Client`.
macro_rules! impl_client_builder_methods {
    (
        client_type: $client:ty,
        model_type: $model:ty,
        provider_name: $provider:expr
    ) => {
        impl $client {
            /// Set the model to use
            #[tracing::instrument(skip(self))]
            pub fn model(mut self, model: impl Into<$model> + std::fmt::Debug) -> Self {
                let model = model.into();
                tracing::debug!(
                    previous_model = ?self.config.model,
                    new_model = ?model,
                    "Setting {} model", $provider
                );
                self.config.model = model;
                self
            }

            /// Set the temperature (0.0 to 2.0, lower = more deterministic)
            #[tracing::instrument(skip(self))]
            pub fn temperature(mut self, temp: f32) -> Self {
                tracing::debug!(
                    previous_temp = self.config.temperature,
                    new_temp = temp,
                    "Setting temperature"
                );
                self.config.temperature = temp;
                self
            }

            /// Set the maximum tokens to generate
            #[tracing::instrument(skip(self))]
            pub fn max_tokens(mut self, max: u32) -> Self {
                tracing::debug!(
                    previous_max = ?self.config.max_tokens,
                    new_max = max,
                    "Setting max_tokens"
                );
                self.config.max_tokens = Some(max);
                self
            }

            /// Set the timeout for each HTTP request (connection and body).
            #[tracing::instrument(skip(self))]
            pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
                tracing::debug!(
                    previous_timeout = ?self.config.timeout,
                    new_timeout = ?timeout,
                    "Setting timeout"
                );
                self.config.timeout = Some(timeout);
                self.client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .unwrap_or_else(|e| {
                        tracing::warn!(
                            error = %e,
                            "Failed to build reqwest client with timeout, using default"
                        );
                        reqwest::Client::new()
                    });
                self
            }

            /// Point the client at a compatible endpoint (proxy, local server).
            #[tracing::instrument(skip(self))]
            pub fn base_url(mut self, base_url: impl Into<String> + std::fmt::Debug) -> Self {
                let base_url = base_url.into();
                tracing::debug!(
                    previous_base_url = ?self.config.base_url,
                    new_base_url = %base_url,
                    "Setting base_url"
                );
                self.config.base_url = Some(base_url);
                self
            }
        }
    };
}

pub(crate) use impl_client_builder_methods;
