//! # salesforce-proxy
//!
//! A small HTTP backend that forwards account operations to the Salesforce
//! REST API, authenticating server-side with the OAuth2 password grant.
//!
//! Clients never see Salesforce credentials. Each inbound request triggers
//! one token exchange followed by one REST call, and the result (or the
//! Salesforce error payload) is relayed back.
//!
//! ## Routes
//!
//! - `GET /` - health check
//! - `GET /test-login` - run the token exchange and return the raw response
//! - `GET /accounts` - first 20 accounts (`Id, Name, Phone, Industry`)
//! - `GET /accounts/{id}` - one account record
//! - `POST /accounts` - create an account from `{Name, Phone, Industry}`
//!
//! ## Example
//!
//! ```rust,no_run
//! use salesforce_proxy::{ProxyConfig, ProxyServer};
//!
//! # async fn example() -> salesforce_proxy::Result<()> {
//! let config = ProxyConfig::from_env()?;
//! let proxy = ProxyServer::builder().config(config).build()?;
//!
//! let app = proxy.router();
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod salesforce;
#[cfg(feature = "axum")]
pub mod server;
pub mod session;

pub use auth::{Authenticator, PasswordAuthenticator};
pub use config::{Credentials, ProxyConfig};
pub use error::{Error, Result, UpstreamError};
#[cfg(feature = "axum")]
pub use server::{ForwardError, Operation, ProxyServer, ProxyServerBuilder};
pub use session::Session;
