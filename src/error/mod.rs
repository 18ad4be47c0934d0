use thiserror::Error;

/// Classification of a failed call to a remote inference provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Missing, empty or rejected API key
    AuthenticationFailed,
    /// The provider rejected the request (HTTP 400/404/422) or the request could not be built
    BadRequest { details: String },
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx
    ServerError { status: u16 },
    /// The provider answered, but not in a shape we understand
    UnexpectedResponse { details: String },
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::AuthenticationFailed => write!(f, "authentication failed"),
            ApiErrorKind::BadRequest { details } => write!(f, "bad request: {}", details),
            ApiErrorKind::RateLimited => write!(f, "rate limited"),
            ApiErrorKind::ServerError { status } => write!(f, "server error (status {})", status),
            ApiErrorKind::UnexpectedResponse { details } => {
                write!(f, "unexpected response: {}", details)
            }
        }
    }
}

impl ApiErrorKind {
    /// Map a non-success HTTP status to an error kind.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ApiErrorKind::AuthenticationFailed,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::ServerError { status },
            _ => ApiErrorKind::BadRequest {
                details: format!("status {}: {}", status, body),
            },
        }
    }
}

/// Error types for the rexpense library.
///
/// The first four variants are the failures callers are expected to handle
/// and surface to a user: the model returned nothing, the model returned
/// something that does not fit the declared schema, a time-range filter was
/// empty, or the ledger file could not be read or written. The remaining
/// variants describe transport and configuration problems.
///
/// # Examples
///
/// ```
/// use rexpense::{RExpenseError, Result};
///
/// fn require_month(month: u32) -> Result<u32> {
///     if !(1..=12).contains(&month) {
///         return Err(RExpenseError::InvalidTimeRange(format!(
///             "month must be between 1 and 12, got {}",
///             month
///         )));
///     }
///     Ok(month)
/// }
///
/// match require_month(13) {
///     Err(RExpenseError::InvalidTimeRange(msg)) => println!("Cannot aggregate: {}", msg),
///     other => println!("Unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum RExpenseError {
    /// The provider returned no choices, or a choice with neither text nor a tool call
    #[error("No response from the model")]
    NoResponse,

    /// Tool arguments or JSON output did not parse, or did not match the declared schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A time-range filter carried no recognised key, or an impossible one
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    /// The ledger file could not be read or written
    #[error("Store I/O error: {0}")]
    StoreIo(String),

    /// A total did not fit in a decimal
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Error reported by the inference provider
    #[error("{provider} API error: {kind}")]
    ApiError {
        provider: String,
        kind: ApiErrorKind,
    },

    /// Invalid client or store configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[cfg(feature = "openai")]
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RExpenseError {
    pub fn api_error(provider: impl Into<String>, kind: ApiErrorKind) -> Self {
        RExpenseError::ApiError {
            provider: provider.into(),
            kind,
        }
    }

    pub fn malformed(details: impl Into<String>) -> Self {
        RExpenseError::MalformedResponse(details.into())
    }

    /// Whether the failure should be answered by asking the user to resubmit their input
    pub fn needs_resubmission(&self) -> bool {
        matches!(
            self,
            RExpenseError::NoResponse | RExpenseError::MalformedResponse(_)
        )
    }
}

impl From<std::io::Error> for RExpenseError {
    fn from(e: std::io::Error) -> Self {
        RExpenseError::StoreIo(e.to_string())
    }
}

impl From<csv::Error> for RExpenseError {
    fn from(e: csv::Error) -> Self {
        RExpenseError::StoreIo(e.to_string())
    }
}

// HttpError and JsonError never compare equal: their sources don't implement PartialEq
impl PartialEq for RExpenseError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoResponse, Self::NoResponse) => true,
            (Self::MalformedResponse(a), Self::MalformedResponse(b)) => a == b,
            (Self::InvalidTimeRange(a), Self::InvalidTimeRange(b)) => a == b,
            (Self::StoreIo(a), Self::StoreIo(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (
                Self::ApiError {
                    provider: pa,
                    kind: ka,
                },
                Self::ApiError {
                    provider: pb,
                    kind: kb,
                },
            ) => pa == pb && ka == kb,
            (Self::Config(a), Self::Config(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for rexpense operations.
pub type Result<T> = std::result::Result<T, RExpenseError>;
