use crate::error::UpstreamError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Result of one OAuth2 password-grant exchange.
///
/// Lives for a single forwarded request and is never stored. Fields other
/// than the two we need (`id`, `token_type`, `issued_at`, `signature`, ...)
/// are kept in `extra` so the token response can be relayed as received.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for REST calls
    pub access_token: String,

    /// Tenant base URL, e.g. `https://acme.my.salesforce.com`
    pub instance_url: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: instance_url.into(),
            extra: Map::new(),
        }
    }

    /// Parse a token endpoint response body.
    ///
    /// Both `access_token` and `instance_url` must be present and non-empty.
    pub fn from_token_response(body: &str) -> Result<Self, UpstreamError> {
        let session: Session = serde_json::from_str(body).map_err(|e| {
            UpstreamError::malformed(format!("invalid token response: {}", e))
        })?;

        if session.access_token.is_empty() {
            return Err(UpstreamError::malformed("token response has empty access_token"));
        }
        if session.instance_url.is_empty() {
            return Err(UpstreamError::malformed("token response has empty instance_url"));
        }

        Ok(session)
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .finish_non_exhaustive()
    }
}
