use base64::{Engine as _, engine::general_purpose};
use std::path::Path;
use tracing::debug;

use crate::error::{RExpenseError, Result};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// An image attached to a message, either inline (base64) or by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Remote location; empty for inline media
    pub uri: String,
    pub mime_type: String,
    /// Base64-encoded bytes for inline media
    pub data: Option<String>,
}

impl MediaFile {
    /// Reference an image by URL.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            data: None,
        }
    }

    /// Inline raw image bytes, base64-encoding them.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            uri: String::new(),
            mime_type: mime_type.into(),
            data: Some(general_purpose::STANDARD.encode(bytes)),
        }
    }

    /// Read and inline an image file. The MIME type is taken from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_from_extension)
            .ok_or_else(|| {
                RExpenseError::Config(format!(
                    "unsupported image type for {}; expected png, jpeg, gif or webp",
                    path.display()
                ))
            })?;
        let bytes = std::fs::read(path).map_err(|e| {
            RExpenseError::Config(format!("cannot read image {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), mime_type, "Loaded image");
        Ok(Self::from_bytes(&bytes, mime_type))
    }
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A role-tagged message: text plus optional images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub media: Vec<MediaFile>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            media: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn user_with_media(content: impl Into<String>, media: Vec<MediaFile>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            media,
        }
    }
}
