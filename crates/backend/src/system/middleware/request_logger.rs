use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware logging every HTTP request:
/// method, path, status code and duration (ms)
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_millis();

    if response.status().is_server_error() {
        tracing::error!("{} {} -> {} ({} ms)", method, uri.path(), status, duration);
    } else if response.status().is_client_error() {
        tracing::warn!("{} {} -> {} ({} ms)", method, uri.path(), status, duration);
    } else {
        tracing::info!("{} {} -> {} ({} ms)", method, uri.path(), status, duration);
    }

    response
}
