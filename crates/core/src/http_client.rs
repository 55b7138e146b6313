use anyhow::Result;
use reqwest::redirect::Policy;
use std::time::Duration;

pub type HttpClient = reqwest::Client;

pub struct BuildHttpClientArgs {
    pub allow_invalid_certs: bool,
    pub request_timeout: Option<Duration>,
}

/// Create a new [`HttpClient`] with the given arguments.
///
/// Redirects are never followed: a redirect from a backend is a response
/// like any other and is relayed to the client verbatim. No default
/// headers are configured either; forwarded requests carry exactly what
/// the client sent plus the provenance headers.
pub fn build_http_client(args: BuildHttpClientArgs) -> Result<HttpClient> {
    let mut builder = reqwest::ClientBuilder::default()
        .redirect(Policy::none())
        .danger_accept_invalid_certs(args.allow_invalid_certs)
        .connect_timeout(Duration::from_secs(5));
    if let Some(timeout) = args.request_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
