//! Forwarding of an inbound request to a resolved backend and verbatim
//! relay of whatever the backend answers.

use crate::{http_client::HttpClient, resolver::BackendHandle};
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Uri},
    response::Response,
};
use thiserror::Error;
use url::Url;

/// Marks a request as having passed through the router.
pub const FORWARDED_BY_HEADER: &str = "x-forwarded-by-router";
/// Carries the URL the router originally received, exactly as received.
pub const ORIGINAL_URL_HEADER: &str = "x-original-url";
/// Carries the project id the request was matched against.
pub const PROJECT_ID_HEADER: &str = "x-project-id";

/// Failure to invoke a backend, carrying the underlying cause.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The outbound request could not be constructed.
    #[error("failed to build outbound request for binding '{binding}': {reason}")]
    BuildRequest {
        /// Binding name of the backend the request was meant for.
        binding: String,
        /// Why construction failed.
        reason: String,
    },
    /// The backend call itself failed at the transport level.
    #[error("request to backend binding '{binding}' failed: {source}")]
    Invoke {
        /// Binding name of the backend that was invoked.
        binding: String,
        /// The transport error reported by the client.
        #[source]
        source: reqwest::Error,
    },
}

impl ForwardError {
    fn build(handle: &BackendHandle, reason: impl ToString) -> Self {
        Self::BuildRequest {
            binding: handle.binding_name().to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Forward `request` to the backend behind `handle` and relay its response.
///
/// The outbound request keeps the inbound method, the full path and query
/// (the project segment is not stripped) and every inbound header, then sets
/// the three provenance headers, overwriting any value a client tried to
/// smuggle in. The body is handed over as a stream and consumed exactly
/// once, so bodies of arbitrary size pass through without buffering.
///
/// The relayed response carries the backend's status, headers and body
/// stream untouched. Errors are returned to the caller, never rendered
/// here.
pub async fn forward(
    client: &HttpClient,
    handle: &BackendHandle,
    identity: &HeaderValue,
    request: Request,
) -> Result<Response, ForwardError> {
    let (parts, body) = request.into_parts();

    let original_url = parts.uri.to_string();
    let target = outbound_url(handle.origin(), &parts.uri)
        .map_err(|err| ForwardError::build(handle, err))?;

    let mut headers = parts.headers;
    headers.insert(FORWARDED_BY_HEADER, identity.clone());
    headers.insert(
        ORIGINAL_URL_HEADER,
        HeaderValue::from_str(&original_url).map_err(|err| ForwardError::build(handle, err))?,
    );
    headers.insert(
        PROJECT_ID_HEADER,
        HeaderValue::from_str(handle.project_id())
            .map_err(|err| ForwardError::build(handle, err))?,
    );

    let upstream = client
        .request(parts.method, target)
        .headers(headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await
        .map_err(|source| ForwardError::Invoke {
            binding: handle.binding_name().to_owned(),
            source,
        })?;

    let status = upstream.status();
    let response_headers = upstream.headers().clone();
    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Retarget the inbound URI at the backend origin, keeping the path and
/// query byte-for-byte as received.
fn outbound_url(origin: &Url, uri: &Uri) -> Result<Url, url::ParseError> {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    Url::parse(&format!(
        "{}{path_and_query}",
        origin.as_str().trim_end_matches('/')
    ))
}
