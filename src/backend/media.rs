use serde::Serialize;

use crate::backend::{ChatMessage, MediaFile};
use crate::error::{ApiErrorKind, RExpenseError, Result};

/// Message content in the chat-completions wire format: a bare string for
/// text-only messages, or a list of typed parts when images are attached.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub(crate) url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<String>,
}

pub(crate) fn build_message_content(
    msg: &ChatMessage,
    provider_name: &str,
) -> Result<MessageContent> {
    if msg.media.is_empty() {
        return Ok(MessageContent::Text(msg.content.clone()));
    }

    let mut parts = Vec::new();
    if !msg.content.is_empty() {
        parts.push(MessagePart::Text {
            text: msg.content.clone(),
        });
    }

    for media in &msg.media {
        parts.push(MessagePart::ImageUrl {
            image_url: ImageUrl {
                url: media_to_url(media, provider_name)?,
                detail: Some("auto".to_string()),
            },
        });
    }

    Ok(MessageContent::Parts(parts))
}

pub(crate) fn media_to_url(media: &MediaFile, provider_name: &str) -> Result<String> {
    let bad_request = |details: &str| {
        RExpenseError::api_error(
            provider_name,
            ApiErrorKind::BadRequest {
                details: details.to_string(),
            },
        )
    };

    match media.data.as_deref() {
        Some("") => Err(bad_request("MediaFile inline data cannot be empty")),
        Some(_) if media.mime_type.is_empty() => {
            Err(bad_request("MediaFile mime_type cannot be empty"))
        }
        Some(data) => Ok(format!("data:{};base64,{}", media.mime_type, data)),
        None if !media.uri.is_empty() => Ok(media.uri.clone()),
        None => Err(bad_request("MediaFile must include either inline data or uri")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_text_only_serializes_as_string() {
        let msg = ChatMessage::user("hello");
        let content = build_message_content(&msg, "OpenAI").expect("content should build");
        let json = serde_json::to_value(&content).expect("content should serialize");
        assert_eq!(json, serde_json::json!("hello"));
    }

    #[test]
    fn test_content_with_media_serializes_as_parts() {
        let msg = ChatMessage::user_with_media(
            "itemize this receipt",
            vec![MediaFile::from_bytes(b"abc", "image/png")],
        );
        let content = build_message_content(&msg, "OpenAI").expect("content should build");
        let json = serde_json::to_value(&content).expect("content should serialize");
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[0]["text"], "itemize this receipt");
        assert_eq!(json[1]["type"], "image_url");
        assert_eq!(json[1]["image_url"]["url"], "data:image/png;base64,YWJj");
        assert_eq!(json[1]["image_url"]["detail"], "auto");
    }

    #[test]
    fn test_image_only_message_has_no_text_part() {
        let msg = ChatMessage::user_with_media(
            "",
            vec![MediaFile::new("https://example.com/r.png", "image/png")],
        );
        let content = build_message_content(&msg, "OpenAI").expect("content should build");
        let json = serde_json::to_value(&content).expect("content should serialize");
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert_eq!(json[0]["image_url"]["url"], "https://example.com/r.png");
    }

    #[test]
    fn test_media_without_data_or_uri_is_rejected() {
        let media = MediaFile::new("", "image/png");
        let err = media_to_url(&media, "OpenAI").unwrap_err();
        assert_eq!(
            err,
            RExpenseError::api_error(
                "OpenAI",
                ApiErrorKind::BadRequest {
                    details: "MediaFile must include either inline data or uri".to_string()
                }
            )
        );
    }

    #[test]
    fn test_inline_media_requires_mime_type() {
        let media = MediaFile::from_bytes(b"abc", "");
        assert!(media_to_url(&media, "OpenAI").is_err());
    }
}
