//! Request ID middleware for correlating logs with requests.
//!
//! Generates a UUID v4 for each incoming request, wraps the request in a
//! tracing span carrying that id, and echoes it back in `x-request-id`.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::header::{HeaderName, HeaderValue};
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the generated request id
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id stored in request extensions.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost layer so the span covers the whole request.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(status = response.status().as_u16(), duration_ms, "Request completed");

        response
            .headers_mut()
            .insert(X_REQUEST_ID.clone(), request_id_header(request_id));
        response
    }
    .instrument(span)
    .await
}

/// Render a request id as a header value.
fn request_id_header(request_id: Uuid) -> HeaderValue {
    let mut buf = Uuid::encode_buffer();
    let text = request_id.hyphenated().encode_lower(&mut buf);
    // Hyphenated UUIDs are lowercase hex and '-', always valid header bytes.
    HeaderValue::from_str(text).expect("hyphenated UUID is a valid header value")
}
