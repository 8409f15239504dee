//! OAuth2 password-grant authentication against the Salesforce token endpoint.
//!
//! Every call to [`Authenticator::authenticate`] performs a fresh token
//! exchange. Nothing is cached between calls; a caching implementation can
//! wrap [`PasswordAuthenticator`] behind the same trait without touching the
//! request handlers.

use crate::config::Credentials;
use crate::error::{Result, UpstreamError};
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of Salesforce sessions for forwarded requests.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtain a session usable for exactly one upstream call.
    async fn authenticate(&self) -> Result<Session>;
}

/// Exchanges fixed credentials for a session using `grant_type=password`.
#[derive(Debug, Clone)]
pub struct PasswordAuthenticator {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
}

impl PasswordAuthenticator {
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials: Arc::new(credentials),
        }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self) -> Result<Session> {
        let creds = &*self.credentials;
        tracing::debug!("requesting token from {}", creds.login_url);

        // reqwest's form() sets application/x-www-form-urlencoded
        let response = self
            .client
            .post(creds.login_url.clone())
            .form(&[
                ("grant_type", "password"),
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("username", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ])
            .send()
            .await
            .map_err(UpstreamError::network)?;

        let status = response.status();
        let body = response.text().await.map_err(UpstreamError::network)?;

        if !status.is_success() {
            tracing::warn!("token endpoint returned {}", status);
            return Err(UpstreamError::from_response(status, &body).into());
        }

        let session = Session::from_token_response(&body)?;
        tracing::debug!("authenticated against {}", session.instance_url);
        Ok(session)
    }
}
