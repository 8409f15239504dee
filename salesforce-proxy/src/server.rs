use crate::{
    account::{ACCOUNT_SOBJECT, Created, LIST_ACCOUNTS_SOQL, NewAccount},
    auth::{Authenticator, PasswordAuthenticator},
    config::ProxyConfig,
    error::{Error, Result},
    salesforce::RestClient,
    session::Session,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Plain-text body of the health check.
pub const HEALTH_TEXT: &str = "Backend is running";

/// Forwards account requests to Salesforce, authenticating on every request.
#[derive(Clone)]
pub struct ProxyServer {
    authenticator: Arc<dyn Authenticator>,
    rest: RestClient,
}

impl ProxyServer {
    /// Create a new proxy server builder.
    pub fn builder() -> ProxyServerBuilder {
        ProxyServerBuilder::default()
    }

    /// Create the axum router with all proxy endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handle_health))
            .route("/test-login", get(handle_test_login))
            .route(
                "/accounts",
                get(handle_list_accounts).post(handle_create_account),
            )
            .route("/accounts/{id}", get(handle_get_account))
            .with_state(self.clone())
    }

    async fn authenticate(&self, op: Operation) -> HandlerResult<Session> {
        self.authenticator.authenticate().await.during(op)
    }
}

/// One proxied route, used to pick the failure status and log label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TestLogin,
    ListAccounts,
    GetAccount,
    CreateAccount,
}

impl Operation {
    /// Status returned to the client when this operation fails.
    ///
    /// Authentication, authorization and data failures are not told apart.
    pub fn failure_status(self) -> StatusCode {
        match self {
            Operation::TestLogin => StatusCode::BAD_REQUEST,
            Operation::ListAccounts | Operation::GetAccount | Operation::CreateAccount => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn label(self) -> &'static str {
        match self {
            Operation::TestLogin => "LOGIN",
            Operation::ListAccounts => "LIST",
            Operation::GetAccount => "DETAILS",
            Operation::CreateAccount => "CREATE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned by a handler: the failing operation plus its cause.
#[derive(Debug)]
pub struct ForwardError {
    pub operation: Operation,
    pub error: Error,
}

impl ForwardError {
    pub fn new(operation: Operation, error: Error) -> Self {
        Self { operation, error }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = self.error.relay_body();
        tracing::error!(error = %self.error, "{} ERROR {}", self.operation, body);

        (self.operation.failure_status(), Json(body)).into_response()
    }
}

trait ForwardResultExt<T> {
    fn during(self, op: Operation) -> std::result::Result<T, ForwardError>;
}

impl<T> ForwardResultExt<T> for Result<T> {
    fn during(self, op: Operation) -> std::result::Result<T, ForwardError> {
        self.map_err(|error| ForwardError::new(op, error))
    }
}

type HandlerResult<T> = std::result::Result<T, ForwardError>;

// Handlers

async fn handle_health() -> &'static str {
    HEALTH_TEXT
}

async fn handle_test_login(State(server): State<ProxyServer>) -> HandlerResult<Json<Session>> {
    tracing::info!("handling test login");
    let session = server.authenticate(Operation::TestLogin).await?;
    Ok(Json(session))
}

async fn handle_list_accounts(
    State(server): State<ProxyServer>,
) -> HandlerResult<Json<Vec<Value>>> {
    let op = Operation::ListAccounts;
    tracing::info!("listing accounts");

    let session = server.authenticate(op).await?;
    let records = server
        .rest
        .query(&session, LIST_ACCOUNTS_SOQL)
        .await
        .during(op)?;

    tracing::info!("returning {} accounts", records.len());
    Ok(Json(records))
}

async fn handle_get_account(
    State(server): State<ProxyServer>,
    Path(id): Path<String>,
) -> HandlerResult<Json<Value>> {
    let op = Operation::GetAccount;
    tracing::info!("fetching account {}", id);

    let session = server.authenticate(op).await?;
    let record = server
        .rest
        .get_sobject(&session, ACCOUNT_SOBJECT, &id)
        .await
        .during(op)?;

    Ok(Json(record))
}

async fn handle_create_account(
    State(server): State<ProxyServer>,
    account: Option<Json<NewAccount>>,
) -> HandlerResult<Json<Created>> {
    let op = Operation::CreateAccount;
    tracing::info!("creating account");

    // No JSON content type means an empty record; Salesforce validates it.
    let account = account.map(|Json(a)| a).unwrap_or_default();

    let session = server.authenticate(op).await?;
    let result = server
        .rest
        .create_sobject(&session, ACCOUNT_SOBJECT, &account)
        .await
        .during(op)?;

    tracing::info!("created account {}", result.id);
    Ok(Json(Created {
        success: true,
        id: result.id,
    }))
}

// Builder for ProxyServer.
#[derive(Default)]
pub struct ProxyServerBuilder {
    config: Option<ProxyConfig>,
    authenticator: Option<Arc<dyn Authenticator>>,
    http_client: Option<reqwest::Client>,
}

impl ProxyServerBuilder {
    pub fn config(mut self, config: ProxyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share one connection pool between authentication and data calls.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the default password-grant authenticator.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn build(self) -> Result<ProxyServer> {
        let config = self
            .config
            .ok_or_else(|| Error::Config("config required".to_string()))?;
        let http = self.http_client.unwrap_or_default();

        let authenticator: Arc<dyn Authenticator> = match self.authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(PasswordAuthenticator::new(
                http.clone(),
                config.credentials.clone(),
            )),
        };

        Ok(ProxyServer {
            authenticator,
            rest: RestClient::new(http, config.api_version),
        })
    }
}
