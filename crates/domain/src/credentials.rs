//! Session credential types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "powershare_access_token";

/// Storage key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "powershare_refresh_token";

/// Access/refresh token pair issued by the auth service.
///
/// The wire shape is `{"accessToken": "...", "refreshToken": "..."}`, which
/// is what both the login and the refresh endpoints return.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    /// Bearer token attached to every authenticated request.
    pub access_token: String,
    /// Token exchanged for a new pair when the access token is rejected.
    #[serde(default)]
    pub refresh_token: String,
}

impl CredentialPair {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns true if both tokens are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.refresh_token.trim().is_empty()
    }

    /// Returns the refresh token, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        let token = self.refresh_token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Returns the `Authorization` header value for this pair.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Get a preview of a token (first 8 chars + ...), safe for logs.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}
