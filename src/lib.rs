//! rexpense: itemize receipts with a multimodal LLM and query the resulting
//! expense ledger by date.
//!
//! # Overview
//!
//! The model does the reading; this crate does the plumbing around it:
//!
//! - Building chat requests with text, inline images and tool (function-call)
//!   schemas, sent through an [`InferenceProvider`] such as [`OpenAIClient`]
//! - Parsing the reply into an explicit [`ExtractionOutcome`]: plain text or
//!   a schema-checked tool invocation
//! - Turning an extracted [`Receipt`] into one [`ExpenseRecord`] per line item
//!   and persisting the [`Ledger`] as CSV
//! - Summing prices over a [`TimeRangeSpec`] (a day, an inclusive range, a
//!   month or a year)
//!
//! # Quick Start
//!
//! ```no_run
//! use rexpense::{Answer, CsvLedgerStore, ExpenseAssistant, MediaFile, OpenAIClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::from_env()?;
//!     let assistant = ExpenseAssistant::new(client, CsvLedgerStore::new("expenses.csv"));
//!
//!     let records = assistant
//!         .ingest_receipt(MediaFile::from_path("receipt.jpg")?)
//!         .await?;
//!     println!("Added {} line items", records.len());
//!
//!     match assistant.ask("How much did I spend in May 2024?").await? {
//!         Answer::Total { range, total } => println!("{}: {}", range, total),
//!         Answer::Text(text) => println!("{}", text),
//!     }
//!     Ok(())
//! }
//! ```
pub mod assistant;
pub mod backend;
mod error;
pub mod extraction;
pub mod ledger;
#[cfg(feature = "logging")]
pub mod logging;
pub mod model;
pub mod query;
pub mod schema;

// Re-exports for convenience
pub use assistant::{Answer, ExpenseAssistant};
pub use backend::{
    ChatMessage, ChatRole, Choice, CompletionRequest, CompletionResponse, InferenceProvider,
    MediaFile, TokenUsage, ToolCall,
};
#[cfg(feature = "openai")]
pub use backend::{OpenAIClient, OpenAIConfig, OpenAIModel};
pub use error::{ApiErrorKind, RExpenseError, Result};
pub use extraction::{
    Extraction, ExtractionOutcome, ExtractionRequest, Extractor, Receipt, ReceiptItem,
};
pub use ledger::{Category, CsvLedgerStore, ExpenseRecord, Ledger, PaymentMethod};
pub use model::StructuredOutput;
pub use query::{TimeRangeArgs, TimeRangeSpec, filter_records, total_expenses};
pub use schema::{Schema, SchemaBuilder, SchemaType, ToolChoice, ToolSchema};
