use miette::{Context, IntoDiagnostic, Result};
use salesforce_proxy::{ProxyConfig, ProxyServer};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const DEFAULT_PORT: u16 = 3000;

fn listen_addr() -> Result<SocketAddr> {
    let host = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("PORT") {
        Ok(port) => port
            .parse::<u16>()
            .into_diagnostic()
            .wrap_err_with(|| format!("invalid PORT {:?}", port))?,
        Err(_) => DEFAULT_PORT,
    };

    format!("{}:{}", host, port)
        .parse()
        .into_diagnostic()
        .wrap_err("invalid BIND_ADDR")
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "server=debug,salesforce_proxy=debug,tower_http=info,info".into()
            }),
        )
        .init();

    // A missing .env is fine; real environment variables still apply.
    match dotenv {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {}", e),
    }

    let config = ProxyConfig::from_env()
        .into_diagnostic()
        .wrap_err("failed to load Salesforce configuration")?;
    tracing::info!(
        "using Salesforce token endpoint {} (API v{})",
        config.credentials.login_url,
        config.api_version
    );

    let proxy = ProxyServer::builder()
        .config(config)
        .http_client(reqwest::Client::new())
        .build()
        .into_diagnostic()
        .wrap_err("failed to build proxy server")?;

    let app = proxy
        .router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .into_diagnostic()
        .wrap_err("failed to bind to address")?;
    tracing::info!("Backend running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .into_diagnostic()
        .wrap_err("server error")?;

    Ok(())
}
