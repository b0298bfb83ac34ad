//! HTTP Request body types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Request body with an optional explicit content type.
///
/// A body without a content type is sent as structured data
/// (`application/json`) by the authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// Explicit content type, if the caller chose one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// The body content.
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Serializes `value` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> DomainResult<Self> {
        let content =
            serde_json::to_string(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        Ok(Self {
            content_type: Some("application/json".to_string()),
            content,
        })
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: Some("text/plain".to_string()),
            content: content.into(),
        }
    }

    /// Creates a body with no explicit content type.
    #[must_use]
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content_type: None,
            content: content.into(),
        }
    }

    /// Returns the explicit content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&serde_json::json!({"refreshToken": "r1"}))
            .expect("serializable");
        assert_eq!(body.content_type(), Some("application/json"));
        assert_eq!(body.content, r#"{"refreshToken":"r1"}"#);
    }

    #[test]
    fn test_text_and_raw_body() {
        assert_eq!(RequestBody::text("motivo").content_type(), Some("text/plain"));
        assert_eq!(RequestBody::raw("{}").content_type(), None);
    }
}
