use anyhow::{Context, Result};
use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use dotenvy::dotenv;
use portico::{PorticoServer, PorticoServerSettings, Project, UpstreamSettings, url::Url};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightMagenta.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about, styles = styles())]
struct AppOptions {
    /// The socket address that the local server should be hosted on.
    #[arg(
        long = "address",
        env = "PORTICO_ADDRESS",
        default_value = "127.0.0.1:3500"
    )]
    address: SocketAddr,

    /// Path to the TOML file declaring the documentation projects and the
    /// backend binding table.
    #[arg(long = "config", env = "PORTICO_CONFIG", default_value = "portico.toml")]
    config: PathBuf,

    /// Identity sent to backends in the x-forwarded-by-router header,
    /// usually the portal's public hostname.
    #[arg(long = "identity", env = "PORTICO_IDENTITY", default_value = "portico")]
    identity: String,

    /// Include backend failure details in 500 response bodies.
    /// Leave disabled outside of local development.
    #[arg(
        long = "expose-error-details",
        env = "PORTICO_EXPOSE_ERROR_DETAILS",
        default_value_t = false
    )]
    expose_error_details: bool,

    /// The maximum lifetime of an incoming request before it is forcefully
    /// terminated (in seconds). Leave empty for no limit.
    #[arg(long = "request-timeout", env = "PORTICO_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// The maximum lifetime of a backend request before it is forcefully
    /// terminated (in seconds). Leave empty for no limit.
    #[arg(
        long = "upstream-request-timeout",
        env = "PORTICO_UPSTREAM_REQUEST_TIMEOUT"
    )]
    upstream_request_timeout: Option<u64>,

    /// DANGEROUS: Allow self-signed/invalid/forged TLS certificates when
    /// making backend requests.
    #[arg(
        long = "upstream-allow-invalid-certs",
        env = "PORTICO_UPSTREAM_ALLOW_INVALID_CERTS",
        default_value_t = false
    )]
    upstream_allow_invalid_certs: bool,
}

/// On-disk portal description: the project table plus the binding table
/// mapping derived binding names to backend origins.
#[derive(Debug, Deserialize)]
struct PortalConfig {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    bindings: HashMap<String, Url>,
}

fn load_portal_config(path: &Path) -> Result<PortalConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read portal config from '{}'", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse portal config at '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .with_thread_ids(true)
        .init();
    let args = AppOptions::parse();

    if args.upstream_allow_invalid_certs {
        println!(
            "WARNING: Running with 'upstream_allow_invalid_certs' will allow backends with Invalid/Forged/No TLS certificates to be proxied, be careful."
        );
    }

    let portal = load_portal_config(&args.config)?;
    PorticoServer::new(PorticoServerSettings {
        projects: portal.projects,
        bindings: portal.bindings,
        identity: args.identity,
        expose_error_details: args.expose_error_details,
        request_timeout: args.request_timeout,
        upstream_settings: UpstreamSettings {
            allow_invalid_certs: args.upstream_allow_invalid_certs,
            request_timeout: args.upstream_request_timeout,
        },
    })?
    .start(&args.address)
    .await
}
