use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Salesforce REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Connected-app and user credentials for the OAuth2 password grant.
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    /// Full URL of the token endpoint, e.g.
    /// `https://login.salesforce.com/services/oauth2/token`
    pub login_url: Url,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        login_url: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            login_url,
        }
    }

    /// Read `SF_CLIENT_ID`, `SF_CLIENT_SECRET`, `SF_USERNAME`, `SF_PASSWORD`
    /// and `SF_LOGIN_URL` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("missing environment variable {}", key)))
        };

        let login_url = require("SF_LOGIN_URL")?;
        let login_url = Url::parse(&login_url)
            .map_err(|e| Error::Config(format!("invalid SF_LOGIN_URL {:?}: {}", login_url, e)))?;

        Ok(Self {
            client_id: require("SF_CLIENT_ID")?,
            client_secret: require("SF_CLIENT_SECRET")?,
            username: require("SF_USERNAME")?,
            password: require("SF_PASSWORD")?,
            login_url,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("login_url", &self.login_url.as_str())
            .finish()
    }
}

/// Configuration for the proxy server
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub credentials: Credentials,

    /// REST API version segment, e.g. `59.0`
    pub api_version: String,
}

impl ProxyConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Credentials from the environment, plus `SF_API_VERSION` if set.
    pub fn from_env() -> Result<Self> {
        let config = Self::new(Credentials::from_env()?);
        Ok(match std::env::var("SF_API_VERSION") {
            Ok(version) if !version.is_empty() => config.with_api_version(version),
            _ => config,
        })
    }

    /// Set the REST API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}
