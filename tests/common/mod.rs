#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use rexpense::{
    Category, Choice, CompletionRequest, CompletionResponse, ExpenseRecord, InferenceProvider,
    PaymentMethod, Result, TokenUsage, ToolCall,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays canned responses and remembers every request.
pub struct FakeProvider {
    responses: Mutex<VecDeque<Result<CompletionResponse>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeProvider {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<CompletionResponse>>) -> Self {
        Self {
            responses: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl InferenceProvider for FakeProvider {
    fn name(&self) -> &str {
        "Fake"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(CompletionResponse::default()))
    }
}

pub fn usage() -> Option<TokenUsage> {
    Some(TokenUsage::new("fake-model", 100, 20))
}

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![Choice::text(text)],
        usage: usage(),
    }
}

pub fn tool_response(name: &str, arguments: &Value) -> CompletionResponse {
    raw_tool_response(name, &arguments.to_string())
}

pub fn raw_tool_response(name: &str, arguments: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![Choice::tool_call(ToolCall::new(name, arguments))],
        usage: usage(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A record with the given date and price in cents; other fields fixed.
pub fn record(y: i32, m: u32, d: u32, cents: i64) -> ExpenseRecord {
    ExpenseRecord::new(
        date(y, m, d),
        "Corner Shop",
        "Item",
        1,
        Decimal::new(cents, 2),
        Category::Groceries,
        PaymentMethod::DebitCard,
    )
    .expect("valid record")
}

/// The two receipts used in the aggregation scenarios.
pub fn may_2024_records() -> Vec<ExpenseRecord> {
    vec![record(2024, 5, 11, 4990), record(2024, 5, 16, 2273)]
}

/// A tiny inline "image"; the provider is faked so the bytes never matter.
pub fn receipt_image() -> rexpense::MediaFile {
    rexpense::MediaFile::from_bytes(b"\x89PNG\r\n\x1a\nreceipt", "image/png")
}

/// `record_receipt` arguments for a two-item grocery receipt.
pub fn receipt_arguments() -> Value {
    serde_json::json!({
        "vendor": "Fresh Market",
        "date": "2024-05-11",
        "items": [
            {"name": "Olive oil", "price": 12.5, "quantity": 1, "category": "Groceries"},
            {"name": "Dish soap", "price": 3.2, "quantity": 2, "category": "Household"}
        ],
        "payment_method": "Credit card"
    })
}
