//! # Módulo HTTP
//!
//! Implementa el protocolo a mano, sin frameworks:
//!
//! - Parsing de requests HTTP/1.0 y HTTP/1.1 (request line, headers, body)
//! - Construcción de responses
//! - Códigos de estado
//! - Codec JSON con ETag, `Cache-Control` y CORS
//!
//! Cada conexión atiende un solo request (`Connection: close`), así que no
//! hay keep-alive ni chunked transfer encoding.

pub mod codec;     // Serialización JSON + caché condicional + CORS
pub mod request;   // Parsing de requests
pub mod response;  // Construcción de responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
