//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Dispatcher que mapea `(método, path)` a handlers.
//!
//! ## Flujo
//!
//! ```text
//! Request ─┬─ OPTIONS ───────────────────────────────→ preflight (200, CORS)
//!          └─ resto → normalizar path → bootstrap → handler ─┬─ Ok  → Response
//!                                                            └─ Err → envelope JSON
//! ```
//!
//! Un panic dentro de un handler se atrapa con `catch_unwind` y sale como
//! 500 con el mismo envelope que cualquier otro error interno.

use crate::error::ApiError;
use crate::http::codec::{self, JsonCodec, ResponseInit};
use crate::http::request::{Method, ParseError};
use crate::http::{Request, Response, StatusCode};
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;
use std::panic::{self, AssertUnwindSafe};

/// Valor del header `Server`
pub const SERVER_NAME: &str = "jobs-edge/0.1";

/// Tipo de función handler
///
/// Recibe el request, el path ya normalizado y el estado compartido.
pub type Handler = fn(&Request, &str, &AppState) -> Result<Response, ApiError>;

/// Router que mapea `(método, path)` a handlers
pub struct Router {
    routes: Vec<(Method, String, Handler)>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con las rutas del servicio de jobs
    pub fn with_job_routes() -> Self {
        let mut router = Self::new();
        router.register(Method::GET, "/jobs", job_handlers::list_handler);
        router.register(Method::HEAD, "/jobs", job_handlers::list_handler);
        router.register(Method::POST, "/jobs", job_handlers::create_handler);
        router
    }

    /// Registra una ruta con su handler
    pub fn register(&mut self, method: Method, path: &str, handler: Handler) {
        self.routes.push((method, normalize_path(path).to_string(), handler));
    }

    /// Ejecuta el handler apropiado para un request
    ///
    /// Nunca falla: cualquier error termina en una respuesta JSON.
    pub fn route(&self, request: &Request, state: &AppState) -> Response {
        if request.method() == Method::OPTIONS {
            let mut response = codec::preflight();
            add_common_headers(&mut response);
            return response;
        }

        let path = normalize_path(request.path());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request, path, state)));

        let mut response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => error_response(&err, Some(request), path, &state.codec),
            Err(payload) => {
                let err = ApiError::Unexpected(panic_message(payload.as_ref()));
                error_response(&err, Some(request), path, &state.codec)
            }
        };

        add_common_headers(&mut response);
        response
    }

    /// Respuesta para bytes que ni siquiera se pudieron parsear como HTTP
    pub fn reject(&self, error: &ParseError, state: &AppState) -> Response {
        let err = ApiError::InvalidRequest(error.to_string());
        let mut response = error_response(&err, None, "/", &state.codec);
        add_common_headers(&mut response);
        response
    }

    fn dispatch(&self, request: &Request, path: &str, state: &AppState) -> Result<Response, ApiError> {
        state.store.bootstrap()?;

        let method = request.method();
        let handler = self
            .routes
            .iter()
            .find(|(m, p, _)| *m == method && p == path)
            .map(|(_, _, handler)| *handler)
            .ok_or(ApiError::NotFound)?;

        handler(request, path, state)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Quita un `/` final (la raíz queda como `/`)
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Convierte un [`ApiError`] en respuesta JSON con caché y CORS
pub fn error_response(
    err: &ApiError,
    request: Option<&Request>,
    path: &str,
    codec: &JsonCodec,
) -> Response {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(path, error = %err, "request failed");
    } else {
        tracing::debug!(path, status = status.as_u16(), error = %err, "request rejected");
    }

    match codec.json(&err.envelope(), request, path, ResponseInit::status(status)) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "could not serialize error envelope");
            let mut response = Response::new(StatusCode::InternalServerError)
                .with_header("content-type", codec::JSON_CONTENT_TYPE)
                .with_body(r#"{"message":"Internal Error"}"#);
            codec::apply_cors(&mut response);
            response
        }
    }
}

/// Agrega headers comunes a todas las respuestas
fn add_common_headers(response: &mut Response) {
    response.add_header("Server", SERVER_NAME);
    response.add_header("Connection", "close");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::jobs::types::Job;
    use crate::jobs::{JobStore, JobTable, StoreError};
    use crate::notify::{LogNotifier, Notification, Notifier, NotifyError};
    use serde_json::Value;
    use std::sync::Arc;

    const WELDER: &str = r#"{"title":"Welder","company":"Acme","location":"Austin","salary":"$25/hr","type":"full-time","description":"...","duration":"30 days"}"#;

    fn request(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    fn post(path: &str, body: &str) -> Request {
        request(&format!(
            "POST {} HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            path,
            body.len(),
            body
        ))
    }

    fn json_body(response: &Response) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    fn assert_cors(response: &Response) {
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("GET, POST, OPTIONS"));
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
    }

    /// Tabla que falla en todo
    struct BrokenTable;

    impl JobTable for BrokenTable {
        fn ensure_schema(&self) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")))
        }
        fn insert(&self, _: &Job) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
        fn select_all(&self) -> Result<Vec<Job>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn send(&self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn boom_handler(_: &Request, _: &str, _: &AppState) -> Result<Response, ApiError> {
        panic!("kaboom")
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/jobs/"), "/jobs");
        assert_eq!(normalize_path("/jobs"), "/jobs");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_post_then_list() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();

        let created = router.route(&post("/jobs", WELDER), &state);
        assert_eq!(created.status(), StatusCode::Created);
        let id = json_body(&created)["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let listed = router.route(&request("GET /jobs HTTP/1.1\r\n\r\n"), &state);
        assert_eq!(listed.status(), StatusCode::Ok);
        let body = json_body(&listed);
        assert_eq!(body[0]["id"], id.as_str());
        assert_eq!(listed.header("cache-control"), Some("public, max-age=600"));
        assert_eq!(listed.header("Connection"), Some("close"));
        assert_cors(&listed);
    }

    #[test]
    fn test_missing_salary_is_rejected_and_not_stored() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();

        let body = WELDER.replace(r#""salary":"$25/hr","#, "");
        let response = router.route(&post("/jobs", &body), &state);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(
            json_body(&response),
            serde_json::json!({"error": "Missing required field: salary"})
        );
        assert_cors(&response);

        let listed = router.route(&request("GET /jobs HTTP/1.1\r\n\r\n"), &state);
        assert_eq!(json_body(&listed), serde_json::json!([]));
    }

    #[test]
    fn test_conditional_get_returns_304() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();
        router.route(&post("/jobs", WELDER), &state);

        let first = router.route(&request("GET /jobs HTTP/1.1\r\n\r\n"), &state);
        let second = router.route(&request("GET /jobs/ HTTP/1.1\r\n\r\n"), &state);
        let etag = first.header("etag").unwrap().to_string();
        assert_eq!(second.header("etag"), Some(etag.as_str()));

        let raw = format!("GET /jobs HTTP/1.1\r\nIf-None-Match: {}\r\n\r\n", etag);
        let cached = router.route(&request(&raw), &state);
        assert_eq!(cached.status(), StatusCode::NotModified);
        assert!(cached.body().is_empty());
        assert_eq!(cached.header("Content-Length"), None);
        assert_cors(&cached);
    }

    #[test]
    fn test_head_has_headers_without_body() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();

        let get = router.route(&request("GET /jobs HTTP/1.1\r\n\r\n"), &state);
        let head = router.route(&request("HEAD /jobs HTTP/1.1\r\n\r\n"), &state);

        assert_eq!(head.status(), StatusCode::Ok);
        assert!(head.body().is_empty());
        assert_eq!(head.header("etag"), get.header("etag"));
        assert_eq!(head.header("Content-Length"), get.header("Content-Length"));
    }

    #[test]
    fn test_options_anywhere_is_preflight() {
        let router = Router::with_job_routes();
        let state = AppState::new(
            JobStore::new(Arc::new(BrokenTable)),
            JsonCodec::new(Arc::new(CachePolicy::default())),
            Arc::new(LogNotifier),
        );

        let response = router.route(&request("OPTIONS /whatever HTTP/1.1\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
        assert_cors(&response);
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_unknown_route_is_404() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();

        for raw in ["GET /nope HTTP/1.1\r\n\r\n", "DELETE /jobs HTTP/1.1\r\n\r\n"] {
            let response = router.route(&request(raw), &state);
            assert_eq!(response.status(), StatusCode::NotFound);
            assert_eq!(json_body(&response), serde_json::json!({"message": "Not Found"}));
            assert_eq!(response.header("cache-control"), Some("public, max-age=3600"));
        }
    }

    #[test]
    fn test_store_failure_is_500_envelope() {
        let router = Router::with_job_routes();
        let state = AppState::new(
            JobStore::new(Arc::new(BrokenTable)),
            JsonCodec::new(Arc::new(CachePolicy::default())),
            Arc::new(LogNotifier),
        );

        let response = router.route(&request("GET /jobs HTTP/1.1\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::InternalServerError);
        let body = json_body(&response);
        assert_eq!(body["message"], "Internal Error");
        assert!(body["error"].as_str().unwrap().contains("disk gone"));
        assert_cors(&response);
    }

    #[test]
    fn test_panicking_handler_is_500_envelope() {
        let mut router = Router::new();
        router.register(Method::GET, "/boom", boom_handler);
        let state = AppState::in_memory();

        let response = router.route(&request("GET /boom HTTP/1.1\r\n\r\n"), &state);

        assert_eq!(response.status(), StatusCode::InternalServerError);
        let body = json_body(&response);
        assert_eq!(body["message"], "Internal Error");
        assert_eq!(body["error"], "kaboom");
    }

    #[test]
    fn test_notifier_failure_does_not_affect_create() {
        let router = Router::with_job_routes();
        let state = AppState::new(
            JobStore::in_memory(),
            JsonCodec::new(Arc::new(CachePolicy::default())),
            Arc::new(Failing),
        );

        let response = router.route(&post("/jobs", WELDER), &state);

        assert_eq!(response.status(), StatusCode::Created);
        assert_eq!(state.store.count().unwrap(), 1);
    }

    #[test]
    fn test_reject_parse_error() {
        let router = Router::with_job_routes();
        let state = AppState::in_memory();

        let response = router.reject(&ParseError::InvalidRequestLine, &state);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(
            json_body(&response),
            serde_json::json!({"error": "Invalid request: Invalid request line format"})
        );
        assert_cors(&response);
    }
}
