use http::StatusCode;
use serde_json::Value;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Salesforce errors (token endpoint or REST API)
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    // Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// A failed call to Salesforce.
///
/// `payload` holds whatever Salesforce sent back in the error body, so it can
/// be relayed to the caller unchanged. Network failures have no payload.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub status: Option<StatusCode>,
    pub payload: Option<Value>,
    pub message: String,
}

impl UpstreamError {
    /// Transport-level failure: nothing came back from Salesforce.
    pub fn network(err: impl fmt::Display) -> Self {
        Self {
            status: None,
            payload: None,
            message: err.to_string(),
        }
    }

    /// Salesforce answered with a non-2xx status.
    ///
    /// The body is kept as JSON when it parses, otherwise as a JSON string of
    /// the raw text. An empty body yields no payload.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let payload = if body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())),
            )
        };

        Self {
            status: Some(status),
            payload,
            message: format!("Request failed with status code {}", status.as_u16()),
        }
    }

    /// Salesforce answered 2xx but the body was not what we expected.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self {
            status: None,
            payload: None,
            message: msg.into(),
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "upstream error ({}): {}", status, self.message),
            None => write!(f, "upstream error: {}", self.message),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl Error {
    /// The JSON body relayed to the client: the upstream payload verbatim if
    /// there is one, otherwise the error message as a JSON string.
    pub fn relay_body(&self) -> Value {
        match self {
            Error::Upstream(UpstreamError {
                payload: Some(payload),
                ..
            }) => payload.clone(),
            Error::Upstream(err) => Value::String(err.message.clone()),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream(UpstreamError::network(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relays_json_payload_verbatim() {
        let body = r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#;
        let err = Error::from(UpstreamError::from_response(StatusCode::NOT_FOUND, body));

        assert_eq!(
            err.relay_body(),
            json!([{
                "errorCode": "NOT_FOUND",
                "message": "The requested resource does not exist"
            }])
        );
    }

    #[test]
    fn non_json_body_is_relayed_as_string() {
        let err = Error::from(UpstreamError::from_response(
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        ));
        assert_eq!(err.relay_body(), json!("<html>bad gateway</html>"));
    }

    #[test]
    fn network_failure_relays_message() {
        let err = Error::from(UpstreamError::network("connection refused"));
        assert_eq!(err.relay_body(), json!("connection refused"));
    }

    #[test]
    fn empty_error_body_falls_back_to_message() {
        let err = Error::from(UpstreamError::from_response(StatusCode::UNAUTHORIZED, ""));
        assert_eq!(
            err.relay_body(),
            json!("Request failed with status code 401")
        );
    }
}
