//! # Codec de Respuestas JSON
//! src/http/codec.rs
//!
//! Toda respuesta JSON del servicio pasa por aquí:
//!
//! ```text
//! payload → serde_json (bytes canónicos) → ETag → ¿If-None-Match coincide?
//!                                                   ├── sí → 304 sin body
//!                                                   └── no → status + body
//! ```
//!
//! Cada respuesta (normal, 304 o error) lleva `cache-control` según la
//! [`CachePolicy`], el `etag` calculado y los tres headers CORS.

use crate::cache::etag::{fingerprint, if_none_match};
use crate::cache::CachePolicy;
use crate::http::request::Method;
use crate::http::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

/// Content-Type de todas las respuestas JSON
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Headers CORS: cualquier origen, GET/POST/OPTIONS, Content-Type/Authorization
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

/// Overrides de la respuesta: status y headers extra
#[derive(Debug, Clone)]
pub struct ResponseInit {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
}

impl ResponseInit {
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl Default for ResponseInit {
    fn default() -> Self {
        Self::status(StatusCode::Ok)
    }
}

/// Agrega los headers CORS a cualquier respuesta
pub fn apply_cors(response: &mut Response) {
    for (name, value) in CORS_HEADERS {
        response.add_header(name, value);
    }
}

/// Respuesta al preflight: 200, sólo CORS, sin body
pub fn preflight() -> Response {
    let mut response = Response::new(StatusCode::Ok).with_body_bytes(Vec::new());
    apply_cors(&mut response);
    response
}

/// Serializa payloads y arma respuestas con caché condicional
#[derive(Debug, Clone)]
pub struct JsonCodec {
    policy: Arc<CachePolicy>,
}

impl JsonCodec {
    pub fn new(policy: Arc<CachePolicy>) -> Self {
        Self { policy }
    }

    /// Serializa `payload` y construye la respuesta completa
    ///
    /// `request` es opcional: sin él (respuestas sintéticas) nunca hay 304.
    ///
    /// # Ejemplo
    /// ```
    /// use jobs_edge::cache::CachePolicy;
    /// use jobs_edge::http::codec::{JsonCodec, ResponseInit};
    /// use jobs_edge::http::StatusCode;
    /// use std::sync::Arc;
    ///
    /// let codec = JsonCodec::new(Arc::new(CachePolicy::default()));
    /// let response = codec
    ///     .json(&serde_json::json!({"message": "Not Found"}), None, "/nope",
    ///           ResponseInit::status(StatusCode::NotFound))
    ///     .unwrap();
    ///
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// assert_eq!(response.header("cache-control"), Some("public, max-age=3600"));
    /// ```
    pub fn json<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        request: Option<&Request>,
        path: &str,
        init: ResponseInit,
    ) -> Result<Response, serde_json::Error> {
        let body = serde_json::to_vec(payload)?;
        Ok(self.from_json_bytes(body, request, path, init))
    }

    /// Igual que [`JsonCodec::json`] pero con el body ya serializado
    pub fn from_json_bytes(
        &self,
        body: Vec<u8>,
        request: Option<&Request>,
        path: &str,
        init: ResponseInit,
    ) -> Response {
        let etag = fingerprint(&body);
        let directive = self.policy.lookup(path);
        let cache_control = directive.header_value();

        if let Some(req) = request {
            let conditional = matches!(req.method(), Method::GET | Method::HEAD)
                && init.status.is_success()
                && directive.revalidate;

            if conditional && req.header("if-none-match").map_or(false, |h| if_none_match(h, &etag)) {
                tracing::debug!(path, etag = %etag, "etag match, replying 304");
                let mut response = Response::new(StatusCode::NotModified)
                    .with_header("cache-control", &cache_control)
                    .with_header("etag", &etag);
                apply_cors(&mut response);
                return response;
            }
        }

        let mut response = Response::new(init.status)
            .with_header("content-type", JSON_CONTENT_TYPE)
            .with_header("cache-control", &cache_control)
            .with_header("etag", &etag)
            .with_body_bytes(body);
        apply_cors(&mut response);

        for (name, value) in &init.headers {
            response.add_header(name, value);
        }

        if request.map_or(false, |req| req.method() == Method::HEAD) {
            response.strip_body();
        }

        response
    }
}
