//! HTTP routes.
//!
//! Only `GET /` is routed. Unknown paths get axum's default 404 and other
//! methods on `/` get its default 405.

pub mod greeting;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::request_id_layer;

/// Cache-Control for the greeting; every probe must reach the process
pub const CACHE_CONTROL_GREETING: &str = "no-store";

/// Creates the Axum router.
pub fn create_router() -> Router {
    let greeting_routes = Router::new()
        .route("/", get(greeting::greeting))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_GREETING),
        ));

    Router::new()
        .merge(greeting_routes)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::middleware::X_REQUEST_ID;

    async fn send(method: Method, uri: &str) -> (StatusCode, http::HeaderMap, String) {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_returns_greeting() {
        let (status, headers, body) = send(Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "✅ Hello from the CI/CD Pipeline!");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let (status, _, body) = send(Method::GET, "/?build=1234&sha=deadbeef").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, greeting::GREETING);
    }

    #[tokio::test]
    async fn test_headers_are_ignored() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ACCEPT, "application/json")
                    .header(header::USER_AGENT, "kube-probe/1.29")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], greeting::GREETING.as_bytes());
    }

    #[tokio::test]
    async fn test_unknown_paths_are_not_found() {
        for path in ["/health", "/nonexistent", "/index.html", "/api/v1"] {
            let (status, _, _) = send(Method::GET, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, _, _) = send(method.clone(), "/").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {method}");
        }
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let (_, first, _) = send(Method::GET, "/").await;
        let (_, second, _) = send(Method::GET, "/").await;

        let first = first.get(&X_REQUEST_ID).unwrap().to_str().unwrap().to_string();
        let second = second.get(&X_REQUEST_ID).unwrap().to_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Send one request under a scoped subscriber and return what it logged.
    async fn logs_for(filter: &str, method: Method, uri: &str) -> (StatusCode, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (status, _, _) = send(method, uri).await;
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (status, output)
    }

    #[tokio::test]
    async fn test_greeting_logs_only_the_access_line() {
        let (status, output) = logs_for("pipeline_hello=trace", Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(output.lines().count(), 1, "unexpected log output: {output}");
        assert!(output.contains("Request completed"));
        assert!(output.contains("status=200"));
    }

    #[tokio::test]
    async fn test_not_found_is_not_escalated() {
        let (status, output) = logs_for("pipeline_hello=info", Method::GET, "/health").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(output.lines().count(), 1, "unexpected log output: {output}");
        assert!(output.contains("INFO"));
        assert!(output.contains("status=404"));
        assert!(!output.contains("WARN") && !output.contains("ERROR"));
    }

    #[tokio::test]
    async fn test_warn_filter_silences_protocol_responses() {
        for (method, uri) in [(Method::GET, "/"), (Method::GET, "/missing"), (Method::POST, "/")] {
            let (_, output) = logs_for("pipeline_hello=warn", method, uri).await;
            assert!(output.is_empty(), "{uri} logged: {output}");
        }
    }
}
