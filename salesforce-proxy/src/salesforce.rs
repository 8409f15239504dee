//! Thin client for the Salesforce REST endpoints the proxy forwards to.

use crate::error::{Error, Result, UpstreamError};
use crate::session::Session;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

/// Response of `POST /sobjects/{type}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    pub id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    records: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    api_version: String,
}

impl RestClient {
    pub fn new(http: reqwest::Client, api_version: impl Into<String>) -> Self {
        Self {
            http,
            api_version: api_version.into(),
        }
    }

    /// Run a SOQL query and return the `records` array of the first page.
    pub async fn query(&self, session: &Session, soql: &str) -> Result<Vec<Value>> {
        let url = self.endpoint(session, &["query"])?;
        tracing::debug!("GET {} q={}", url, soql);

        let request = self
            .http
            .get(url)
            .header(http::header::AUTHORIZATION, session.bearer())
            .query(&[("q", soql)]);

        let response: QueryResponse = send(request).await?;
        Ok(response.records)
    }

    /// Fetch one record by id.
    pub async fn get_sobject(&self, session: &Session, sobject: &str, id: &str) -> Result<Value> {
        let url = self.endpoint(session, &["sobjects", sobject, id])?;
        tracing::debug!("GET {}", url);

        let request = self
            .http
            .get(url)
            .header(http::header::AUTHORIZATION, session.bearer());

        send(request).await
    }

    /// Insert one record.
    pub async fn create_sobject<T: Serialize + ?Sized>(
        &self,
        session: &Session,
        sobject: &str,
        record: &T,
    ) -> Result<CreateResult> {
        let url = self.endpoint(session, &["sobjects", sobject])?;
        tracing::debug!("POST {}", url);

        let request = self
            .http
            .post(url)
            .header(http::header::AUTHORIZATION, session.bearer())
            .json(record);

        send(request).await
    }

    /// `{instance_url}/services/data/v{version}/{segments..}`, with each
    /// segment percent-encoded.
    fn endpoint(&self, session: &Session, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&session.instance_url).map_err(|e| {
            UpstreamError::malformed(format!(
                "invalid instance_url {:?}: {}",
                session.instance_url, e
            ))
        })?;

        let version = format!("v{}", self.api_version);
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::malformed(format!(
                    "instance_url {:?} cannot be a base",
                    session.instance_url
                ))
            })?
            .pop_if_empty()
            .extend(["services", "data", version.as_str()])
            .extend(segments);

        Ok(url)
    }
}

/// Send a request and decode a 2xx JSON body, mapping everything else to an
/// upstream error that keeps Salesforce's error payload.
async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!("salesforce returned {}", status);
        return Err(UpstreamError::from_response(status, &body).into());
    }

    serde_json::from_str(&body).map_err(|e| {
        Error::Upstream(UpstreamError::malformed(format!(
            "unexpected response body: {}",
            e
        )))
    })
}
