//! Development host: event stream, reload client and the static web root.

use crate::dev::{BuildStatus, ConnectionGuard, DevConfig, SharedState};
use crate::error::{CliError, Result};
use crate::locale::{Locale, resolve_locale};
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri, header},
    middleware,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::get,
};
use std::convert::Infallible;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio_stream::Stream;
use tower_http::cors::{Any, CorsLayer};

/// Route of the browser reload client.
pub const RELOAD_SCRIPT_PATH: &str = "/__devreload__.js";

/// Route of the JSON status endpoint.
pub const STATUS_PATH: &str = "/__devreload__/status";

const RELOAD_SCRIPT: &str = include_str!("../../assets/reload-client.js");
const SSE_PATH_PLACEHOLDER: &str = "__DEVRELOAD_SSE_PATH__";

#[derive(Clone)]
struct AppState {
    state: SharedState,
    web_root: Arc<PathBuf>,
    sse_path: Arc<str>,
}

/// Development server.
pub struct DevServer {
    config: DevConfig,
    state: SharedState,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevConfig, state: SharedState) -> Self {
        Self { config, state }
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        let app = AppState {
            state: Arc::clone(&self.state),
            web_root: Arc::new(self.config.web_root.clone()),
            sse_path: Arc::from(self.config.base.sse_path.as_str()),
        };

        Router::new()
            .route(&self.config.base.sse_path, get(handle_sse))
            .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
            .route(STATUS_PATH, get(handle_status))
            .fallback(handle_static)
            .layer(middleware::from_fn(crate::dev::middleware::security_headers))
            .layer(middleware::from_fn(resolve_locale))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(app)
    }

    /// Bind the configured address and serve until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns error if server cannot bind to configured address
    pub async fn start<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        let bound = listener.local_addr()?;
        crate::ui::success(&format!("Development server running at http://{}", bound));

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    ///
    /// Open event streams must end before graceful shutdown can finish;
    /// close them with [`ConnectionRegistry::close_all`](crate::dev::ConnectionRegistry::close_all).
    pub async fn serve<F>(self, listener: tokio::net::TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}

/// Register a connection and stream its queue.
async fn handle_sse(State(app): State<AppState>) -> impl IntoResponse {
    let (id, mut rx) = app.state.clients.register();
    let guard = ConnectionGuard::new(Arc::clone(&app.state.clients), id);

    tracing::info!(
        "Client {} connected ({} open)",
        id,
        app.state.client_count()
    );

    let stream = async_stream::stream! {
        // Dropped with the stream when the client goes away.
        let _guard = guard;
        while let Some(message) = rx.recv().await {
            yield Ok::<Event, Infallible>(message.to_event());
        }
    };

    sse_response(stream)
}

fn sse_response<S>(stream: S) -> impl IntoResponse
where
    S: Stream<Item = std::result::Result<Event, Infallible>> + Send + 'static,
{
    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream),
    )
}

/// Serve the reload client script.
async fn handle_reload_script(State(app): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        reload_script(&app.sse_path),
    )
}

fn reload_script(sse_path: &str) -> String {
    let literal = serde_json::Value::from(sse_path).to_string();
    RELOAD_SCRIPT.replace(SSE_PATH_PLACEHOLDER, &literal)
}

/// Last build status and number of connected clients.
async fn handle_status(State(app): State<AppState>, locale: Locale) -> impl IntoResponse {
    let status = app.state.get_status();
    let duration_ms = match &status {
        BuildStatus::Success { duration_ms } => Some(*duration_ms),
        _ => None,
    };

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Json(serde_json::json!({
            "status": status.label(),
            "duration_ms": duration_ms,
            "error": status.error(),
            "clients": app.state.client_count(),
            "sse_path": &*app.sse_path,
            "locale": locale.culture(),
        })),
    )
}

/// Serve a file from the web root.
async fn handle_static(State(app): State<AppState>, uri: Uri) -> Response {
    let Some(relative) = sanitize_path(uri.path()) else {
        return (StatusCode::BAD_REQUEST, "Invalid path").into_response();
    };

    let mut file_path = app.web_root.join(&relative);
    if tokio::fs::metadata(&file_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        file_path = file_path.join("index.html");
    }

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = determine_content_type(&file_path);
            let body = if content_type.starts_with("text/html") {
                inject_reload_script(&content)
            } else {
                content
            };

            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                body,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            format!("File not found: {}", uri.path()),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Failed to read file {}: {}", file_path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}

/// Request path as a path relative to the web root.
///
/// Returns `None` for anything that could escape the root.
fn sanitize_path(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

/// Inject reload script into HTML content.
///
/// Adds the reload client script before the closing </body> tag.
fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{}"></script>"#, RELOAD_SCRIPT_PATH);

    if let Some(pos) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + script_tag.len() + 4);
        result.push_str(&html[..pos]);
        result.push_str(&script_tag);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result.into_bytes();
    }

    let mut result = html.into_owned();
    result.push('\n');
    result.push_str(&script_tag);
    result.into_bytes()
}

/// Determine content type from file extension.
fn determine_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_reload_script_with_body() {
        let html = b"<html><body><h1>Test</h1></body></html>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();

        let script_pos = result
            .find(r#"<script src="/__devreload__.js"></script>"#)
            .unwrap();
        let body_pos = result.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn test_inject_reload_script_without_body() {
        let html = b"<html><h1>Test</h1></html>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();
        assert!(result.ends_with(r#"<script src="/__devreload__.js"></script>"#));
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/"), Some(PathBuf::new()));
        assert_eq!(
            sanitize_path("/bundles/app.js"),
            Some(PathBuf::from("bundles/app.js"))
        );
        assert_eq!(
            sanitize_path("/./css/site.css"),
            Some(PathBuf::from("css/site.css"))
        );
        assert_eq!(sanitize_path("/../secrets.txt"), None);
        assert_eq!(sanitize_path("/assets/../../etc/passwd"), None);
    }

    #[test]
    fn test_determine_content_type() {
        assert_eq!(
            determine_content_type(Path::new("index.HTML")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            determine_content_type(Path::new("bundles/site.css")),
            "text/css; charset=utf-8"
        );
        assert_eq!(
            determine_content_type(Path::new("Makefile")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_reload_script_points_at_sse_path() {
        let script = reload_script("/events");
        assert!(script.contains(r#"new EventSource(ENDPOINT)"#));
        assert!(script.contains(r#"const ENDPOINT = "/events";"#));
        assert!(!script.contains(SSE_PATH_PLACEHOLDER));
    }

    #[test]
    fn test_reload_script_decodes_errors_as_utf8() {
        let script = reload_script("/sse");
        assert!(script.contains("atob(event.data)"));
        assert!(script.contains("new TextDecoder().decode(bytes)"));
        assert!(!script.contains("console.error(atob("));
    }
}
