use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs every 4xx (warn) and 5xx (error) response with a preview of its body.
/// The body is buffered and handed back unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let request_id = request_id_of(&req);
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = status.as_u16();
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, preview)) => {
            if status >= 500 {
                tracing::error!(status, request_id = %request_id, method = %method, uri = %uri, latency_ms, body = %preview, "request failed");
            } else {
                tracing::warn!(status, request_id = %request_id, method = %method, uri = %uri, latency_ms, body = %preview, "request rejected");
            }
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            tracing::error!(status, request_id = %request_id, method = %method, uri = %uri, latency_ms, error = ?err, "failed to read error response body");
            Response::from_parts(parts, Body::empty())
        }
    }
}

fn request_id_of(req: &Request<Body>) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string())
}

async fn buffer_body(body: Body) -> Result<(Bytes, String), AxumError> {
    let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES).await?;
    Ok((bytes.clone(), preview(&bytes)))
}

fn preview(bytes: &[u8]) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_bodies() {
        let body = vec![b'x'; MAX_LOGGED_BODY_BYTES + 10];
        let text = preview(&body);
        assert!(text.ends_with(&format!("(truncated, {} bytes total)", body.len())));
        assert_eq!(preview(b"{\"code\":\"NOT_FOUND\"}"), "{\"code\":\"NOT_FOUND\"}");
    }

    #[test]
    fn request_id_comes_from_extensions() {
        let mut req = Request::new(Body::empty());
        assert_eq!(request_id_of(&req), "-");
        req.extensions_mut().insert(RequestId("req-42".to_string()));
        assert_eq!(request_id_of(&req), "req-42");
    }
}
