//! Request ID middleware for correlating logs with requests.
//!
//! Assigns a UUID v4 to every incoming request and wraps its processing in a
//! tracing span carrying that ID, so all logs emitted while handling the
//! request can be correlated.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Request ID stored in request extensions, available to handlers that
/// want to echo it.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Outermost middleware layer: generates the request ID, opens the request
/// span, and logs completion with status and latency.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    request.extensions_mut().insert(RequestId(request_id));

    let start = Instant::now();
    async move {
        let response = next.run(request).await;
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}
