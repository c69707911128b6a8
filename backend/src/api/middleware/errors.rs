use crate::api::middleware::TraceId;
use crate::core::error::{ErrorResponse, RosterError};
use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Gives every error response the same JSON body, stamped with the request's
/// trace ID.
///
/// axum answers unmatched paths (404) and unmatched methods (405) with an
/// empty body, and the timeout layer does the same for 408; those get a
/// `RosterError` body, keeping the `Allow` header of a 405. Error bodies
/// produced by `RosterError` carry a fresh ID until this layer replaces it
/// with the one in the `X-Trace-Id` header. Must run inside
/// `trace_id_middleware`.
pub async fn error_body_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let trace_id = request.extensions().get::<TraceId>().cloned();

    let mut response = next.run(request).await;

    if !response.headers().contains_key(header::CONTENT_TYPE) {
        let error = match response.status() {
            StatusCode::NOT_FOUND => Some(RosterError::NotFound(format!("No route for {}", path))),
            StatusCode::METHOD_NOT_ALLOWED => Some(RosterError::MethodNotAllowed(format!(
                "Method \"{}\" not allowed",
                method
            ))),
            StatusCode::REQUEST_TIMEOUT => Some(RosterError::Timeout(format!(
                "{} {} took too long",
                method, path
            ))),
            _ => None,
        };

        if let Some(error) = error {
            let allow = response.headers().get(header::ALLOW).cloned();
            response = error.into_response();
            if let Some(allow) = allow {
                response.headers_mut().insert(header::ALLOW, allow);
            }
        }
    }

    let body = response.extensions_mut().remove::<ErrorResponse>();
    match (trace_id, body) {
        (Some(trace_id), Some(body)) => replace_body(response, body.with_trace_id(trace_id.0)),
        _ => response,
    }
}

fn replace_body(response: Response, body: ErrorResponse) -> Response {
    let (mut parts, original) = response.into_parts();
    match serde_json::to_vec(&body) {
        Ok(bytes) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error body");
            Response::from_parts(parts, original)
        }
    }
}
