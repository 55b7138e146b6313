use crate::{AppState, forward, pages};
use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

/// Dispatch for every path other than the landing page.
///
/// Project paths look like `/{id}/...`; the id is matched raw and
/// case-sensitively against the registry. A bare `/{id}` with no trailing
/// separator matches no route and gets the generic 404, same as any other
/// unroutable path.
pub async fn docs_handler(State(state): State<AppState>, request: Request) -> Response {
    let Some(project_id) = project_segment(request.uri().path()).map(str::to_owned) else {
        return pages::render_not_found(None).into_response();
    };

    let Some(handle) = state.resolver.resolve(&project_id) else {
        debug!(project = %project_id, "request for unroutable project");
        return pages::render_not_found(Some(&project_id)).into_response();
    };

    match forward::forward(&state.client, handle, &state.identity, request).await {
        Ok(response) => response,
        Err(err) => {
            error!(project = %project_id, error = %err, "failed to forward request to backend");
            pages::render_server_error(&err.to_string(), state.expose_error_details)
                .into_response()
        }
    }
}

/// Handles requests whose method has no route on an otherwise known path,
/// which the router treats the same as an unknown path.
pub async fn not_found_handler() -> impl IntoResponse {
    pages::render_not_found(None)
}

fn project_segment(path: &str) -> Option<&str> {
    let (id, _rest) = path.strip_prefix('/')?.split_once('/')?;
    if id.is_empty() { None } else { Some(id) }
}
