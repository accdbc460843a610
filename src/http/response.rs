//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas de forma programática y convertirlas a
//! bytes para enviar al cliente. El cuerpo JSON, el ETag y los headers de
//! caché/CORS los arma [`crate::http::codec`]; aquí sólo vive el formato
//! de transporte.
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! content-type: application/json; charset=utf-8\r\n
//! Content-Length: 2\r\n
//! \r\n
//! []
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use jobs_edge::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("content-type", "application/json; charset=utf-8")
//!     .with_body("[]");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\n[]"));
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers HTTP. El HashMap evita duplicados; la búsqueda con
    /// [`Response::header`] ignora mayúsculas.
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta (si ya existe, se sobrescribe)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        // Sobrescribir aunque el nombre previo difiera en mayúsculas
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Descarta el body conservando `Content-Length` (respuestas a HEAD)
    pub fn strip_body(&mut self) {
        self.body.clear();
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera:
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(256 + self.body.len());

        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            // 304: sin body ni Content-Length
            if self.status.forbids_body() && name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        if !self.status.forbids_body() {
            result.extend_from_slice(&self.body);
        }

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
