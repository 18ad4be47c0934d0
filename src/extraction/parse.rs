use serde_json::Value;
use tracing::{error, trace, warn};

use super::{Extraction, ExtractionOutcome};
use crate::backend::CompletionResponse;
use crate::error::{RExpenseError, Result};
use crate::schema::ToolSchema;

/// Turn a provider response into an [`Extraction`].
///
/// Only the first choice is considered. A tool call wins over text; if the
/// model made several calls the first one is used. The call must name one
/// of `tools` and its arguments must be a JSON object of the declared
/// shape.
pub fn parse_response(response: CompletionResponse, tools: &[ToolSchema]) -> Result<Extraction> {
    let usage = response.usage;
    let Some(choice) = response.choices.into_iter().next() else {
        error!("Provider returned no choices");
        return Err(RExpenseError::NoResponse);
    };
    trace!(finish_reason = ?choice.finish_reason, "Completion finish reason");

    let mut calls = choice.tool_calls.into_iter();
    let outcome = match calls.next() {
        Some(call) => {
            let ignored = calls.count();
            if ignored > 0 {
                warn!(tool = %call.name, ignored, "Model made several tool calls, using the first");
            }

            let tool = tools.iter().find(|t| t.name == call.name).ok_or_else(|| {
                RExpenseError::malformed(format!("model invoked undeclared tool '{}'", call.name))
            })?;

            let arguments: Value = serde_json::from_str(&call.arguments).map_err(|e| {
                error!(
                    error = %e,
                    arguments = %call.arguments,
                    "Tool arguments are not valid JSON"
                );
                RExpenseError::malformed(format!(
                    "arguments for '{}' are not valid JSON: {}",
                    call.name, e
                ))
            })?;
            if !arguments.is_object() {
                return Err(RExpenseError::malformed(format!(
                    "arguments for '{}' must be a JSON object",
                    call.name
                )));
            }
            tool.check_arguments(&arguments)?;

            ExtractionOutcome::ToolInvocation {
                name: call.name,
                arguments,
            }
        }
        None => match choice.content {
            Some(text) => ExtractionOutcome::PlainText(text),
            None => {
                error!("Choice carries neither text nor a tool call");
                return Err(RExpenseError::NoResponse);
            }
        },
    };

    Ok(Extraction { outcome, usage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Choice, TokenUsage, ToolCall};
    use crate::schema::SchemaBuilder;
    use serde_json::json;

    fn tools() -> Vec<ToolSchema> {
        vec![ToolSchema::new(
            "get_total_expenses",
            "Sum expenses",
            SchemaBuilder::object()
                .property("year", json!({"type": "integer"}), true)
                .build(),
        )]
    }

    fn response(choices: Vec<Choice>) -> CompletionResponse {
        CompletionResponse {
            choices,
            usage: Some(TokenUsage::new("gpt-4o", 10, 5)),
        }
    }

    #[test]
    fn test_no_choices_is_no_response() {
        let err = parse_response(response(vec![]), &tools()).unwrap_err();
        assert_eq!(err, RExpenseError::NoResponse);
    }

    #[test]
    fn test_empty_choice_is_no_response() {
        let err = parse_response(response(vec![Choice::default()]), &tools()).unwrap_err();
        assert_eq!(err, RExpenseError::NoResponse);
    }

    #[test]
    fn test_text_choice_is_plain_text() {
        let extraction =
            parse_response(response(vec![Choice::text("Hi there")]), &tools()).expect("text");
        assert_eq!(
            extraction.outcome,
            ExtractionOutcome::PlainText("Hi there".to_string())
        );
        assert_eq!(extraction.usage, Some(TokenUsage::new("gpt-4o", 10, 5)));
    }

    #[test]
    fn test_empty_text_is_still_plain_text() {
        let extraction = parse_response(response(vec![Choice::text("")]), &[]).expect("text");
        assert_eq!(extraction.outcome, ExtractionOutcome::PlainText(String::new()));
    }

    #[test]
    fn test_tool_call_is_decoded() {
        let call = ToolCall::new("get_total_expenses", r#"{"year": 2024}"#);
        let extraction =
            parse_response(response(vec![Choice::tool_call(call)]), &tools()).expect("tool call");
        assert_eq!(
            extraction.outcome,
            ExtractionOutcome::ToolInvocation {
                name: "get_total_expenses".to_string(),
                arguments: json!({"year": 2024}),
            }
        );
    }

    #[test]
    fn test_tool_call_wins_over_text_and_first_call_is_used() {
        let choice = Choice {
            content: Some("Let me check.".to_string()),
            tool_calls: vec![
                ToolCall::new("get_total_expenses", r#"{"year": 2024}"#),
                ToolCall::new("get_total_expenses", r#"{"year": 2023}"#),
            ],
            finish_reason: Some("tool_calls".to_string()),
        };
        let extraction = parse_response(response(vec![choice]), &tools()).expect("tool call");
        assert_eq!(
            extraction.outcome,
            ExtractionOutcome::ToolInvocation {
                name: "get_total_expenses".to_string(),
                arguments: json!({"year": 2024}),
            }
        );
    }

    #[test]
    fn test_invalid_json_arguments_are_malformed() {
        let call = ToolCall::new("get_total_expenses", r#"{"year": 20"#);
        let err = parse_response(response(vec![Choice::tool_call(call)]), &tools()).unwrap_err();
        assert!(matches!(err, RExpenseError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_arguments_are_malformed() {
        let call = ToolCall::new("get_total_expenses", "2024");
        let err = parse_response(response(vec![Choice::tool_call(call)]), &tools()).unwrap_err();
        assert_eq!(
            err,
            RExpenseError::MalformedResponse(
                "arguments for 'get_total_expenses' must be a JSON object".to_string()
            )
        );
    }

    #[test]
    fn test_missing_required_argument_is_malformed() {
        let call = ToolCall::new("get_total_expenses", "{}");
        let err = parse_response(response(vec![Choice::tool_call(call)]), &tools()).unwrap_err();
        assert!(matches!(err, RExpenseError::MalformedResponse(_)));
    }

    #[test]
    fn test_undeclared_tool_is_malformed() {
        let call = ToolCall::new("delete_everything", "{}");
        let err = parse_response(response(vec![Choice::tool_call(call)]), &tools()).unwrap_err();
        assert_eq!(
            err,
            RExpenseError::MalformedResponse(
                "model invoked undeclared tool 'delete_everything'".to_string()
            )
        );
    }
}
