//! Crate for Portico, a path-based request router for documentation
//! portals.
//!
//! Requests to `/{project}/...` are forwarded to the backend bound to that
//! project with method, headers, body and the full path preserved, plus
//! three provenance headers. The backend's response is relayed verbatim.
//! `GET /` renders a directory of every registered project; everything else
//! is a structured 404/500 page.

#[cfg(feature = "rustls-tls")]
#[cfg(feature = "native-tls")]
compile_error!("You can only enable one TLS backend");

pub extern crate url;

mod forward;
mod http_client;
mod pages;
mod registry;
mod resolver;
mod routes;

pub use forward::{FORWARDED_BY_HEADER, ForwardError, ORIGINAL_URL_HEADER, PROJECT_ID_HEADER};
pub use registry::{Project, ProjectRegistry};
pub use resolver::{BINDING_SUFFIX, BackendHandle, ServiceResolver, binding_name};

use crate::http_client::{BuildHttpClientArgs, HttpClient, build_http_client};
use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::{self, HeaderValue, header},
    response::Html,
    routing::get,
};
use std::{any::Any, collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{self, TraceLayer},
};
use tracing::{Level, error, info};
use url::Url;

/// # Example
/// ```rust,no_run
/// use std::net::{SocketAddr, IpAddr, Ipv4Addr};
/// use portico::{PorticoServer, PorticoServerSettings};
///
/// # #[tokio::main]
/// # async fn main() {
/// let server = PorticoServer::new(PorticoServerSettings::default()).unwrap();
/// server.start(&SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 3500)).await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PorticoServer {
    router_inner: Router,
}

/// Settings to run the Portico server with.
#[derive(Debug, Clone)]
pub struct PorticoServerSettings {
    /// The projects this router serves, in the order the landing page
    /// should list them.
    pub projects: Vec<Project>,
    /// The hosting environment's binding table: binding name (see
    /// [`binding_name`]) to backend origin. Registered projects without an
    /// entry are reported at start-up and answer 404.
    pub bindings: HashMap<String, Url>,
    /// Value of the router-identity provenance header added to every
    /// forwarded request, typically the portal's public hostname.
    pub identity: String,
    /// Whether 500 response bodies include the underlying error message.
    /// Keep disabled outside of local development.
    pub expose_error_details: bool,
    /// How long (in seconds) to allow an incoming request to be processed
    /// before it is abandoned and an error is sent to the client. `None`
    /// imposes no limit; a hung backend then hangs only its own request.
    pub request_timeout: Option<u64>,
    /// See [`UpstreamSettings`].
    pub upstream_settings: UpstreamSettings,
}

/// Configuration options used when making any call to a backend service.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Whether or not to allow invalid/expired/forged TLS certificates when
    /// making backend requests.
    ///
    /// Enabling this is dangerous and is usually not necessary.
    pub allow_invalid_certs: bool,
    /// How long (in seconds) to wait for a backend to complete a response
    /// before the call is abandoned and reported as failed. `None` waits
    /// for as long as the backend takes.
    pub request_timeout: Option<u64>,
}

impl Default for PorticoServerSettings {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            bindings: HashMap::new(),
            identity: env!("CARGO_PKG_NAME").to_owned(),
            expose_error_details: false,
            request_timeout: None,
            upstream_settings: UpstreamSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            allow_invalid_certs: false,
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
struct AppState {
    registry: Arc<ProjectRegistry>,
    resolver: Arc<ServiceResolver>,
    client: HttpClient,
    identity: HeaderValue,
    expose_error_details: bool,
}

impl PorticoServer {
    /// Create a new [`PorticoServer`] using the provided
    /// [`PorticoServerSettings`].
    pub fn new(settings: PorticoServerSettings) -> Result<Self> {
        let registry = Arc::new(ProjectRegistry::new(settings.projects)?);
        let resolver = Arc::new(ServiceResolver::new(
            Arc::clone(&registry),
            &settings.bindings,
        ));
        let identity = HeaderValue::from_str(&settings.identity)
            .context("router identity must be a valid header value")?;
        info!(
            projects = registry.len(),
            identity = %settings.identity,
            "configured project registry"
        );

        let router = Router::new()
            .route(routes::INDEX_ENDPOINT, get(routes::index_handler))
            .fallback(routes::docs_handler)
            .method_not_allowed_fallback(routes::not_found_handler)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(CatchPanicLayer::custom(handle_panic))
            .with_state(AppState {
                registry,
                resolver,
                client: build_http_client(BuildHttpClientArgs {
                    allow_invalid_certs: settings.upstream_settings.allow_invalid_certs,
                    request_timeout: settings
                        .upstream_settings
                        .request_timeout
                        .map(Duration::from_secs),
                })?,
                identity,
                expose_error_details: settings.expose_error_details,
            });
        let router = match settings.request_timeout {
            Some(secs) => router.layer(TimeoutLayer::new(Duration::from_secs(secs))),
            None => router,
        };

        Ok(Self {
            router_inner: router,
        })
    }

    /// Start the server and expose it on the provided [`SocketAddr`].
    pub async fn start(self, address: &SocketAddr) -> Result<()> {
        let tcp_listener = TcpListener::bind(&address).await?;
        info!("Listening on http://{}", tcp_listener.local_addr()?);
        axum::serve(tcp_listener, self.router_inner)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("failed to listen for ctrl-c");
            })
            .await?;

        Ok(())
    }
}

/// Last-resort conversion of a dispatch panic into a well-formed 500.
/// Details stay in the logs; the response body is always generic.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> http::Response<Body> {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    error!("panic while handling request: {detail}");

    let (status, Html(markup)) = pages::render_server_error(detail, false);
    http::Response::builder()
        .status(status)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )
        .body(Body::from(markup))
        .expect("static error response should always build")
}
