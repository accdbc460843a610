//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Parser mínimo para los requests que recibe el servicio.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /jobs?src=web HTTP/1.1\r\n
//! Host: api.example.com\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 17\r\n
//! \r\n
//! {"title":"Welder"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.x`
//! 2. **Headers**: Pares `Name: Value` (uno por línea, sin distinguir mayúsculas)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: bytes crudos (sólo se conservan para POST/PUT/PATCH)

use std::collections::HashMap;

/// Separador entre headers y body
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    /// Preflight CORS
    OPTIONS,
}

impl Method {
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
        }
    }

    /// Métodos cuyo body se conserva
    fn carries_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path sin query string (ej: "/jobs/")
    path: String,

    /// Headers HTTP tal como llegaron
    headers: HashMap<String, String>,

    /// Body del request
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request incompleto o truncado
    IncompleteRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Versión HTTP no soportada
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Body más grande que el límite configurado
    BodyTooLarge(usize),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::BodyTooLarge(n) => write!(f, "Body exceeds {} bytes", n),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Posición del primer byte del body, si los headers ya terminaron
pub fn header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

/// Lee `Content-Length` de un bloque de headers crudo (sin parsear el resto)
///
/// Lo usa el transporte para saber cuántos bytes más leer del socket.
/// `Ok(None)` si el header no está; un valor no numérico es un error.
pub fn content_length(head: &[u8]) -> Result<Option<usize>, ParseError> {
    let text = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;
    text.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| parse_length(value))
        .transpose()
}

fn parse_length(value: &str) -> Result<usize, ParseError> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| ParseError::InvalidHeader(format!("Content-Length: {}", value)))
}

impl Request {
    /// Parsea un request desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use jobs_edge::http::Request;
    ///
    /// let raw = b"GET /jobs/?page=2 HTTP/1.1\r\nIf-None-Match: \"abc\"\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/jobs/");
    /// assert_eq!(request.header("if-none-match"), Some("\"abc\""));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        // Sin línea vacía asumimos que no hay body (ej: "GET / HTTP/1.0\r\n")
        let (head, body) = match header_end(buffer) {
            Some(end) => (&buffer[..end - HEADER_TERMINATOR.len()], &buffer[end..]),
            None => (buffer, &buffer[buffer.len()..]),
        };

        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;
        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;

        let (method, path) = Self::parse_request_line(request_line)?;
        let headers = Self::parse_headers(lines)?;

        let body = if method.carries_body() {
            let declared = headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| parse_length(value))
                .transpose()?;
            match declared {
                Some(len) if len <= body.len() => body[..len].to_vec(),
                Some(_) => return Err(ParseError::IncompleteRequest),
                None => body.to_vec(),
            }
        } else {
            Vec::new()
        };

        Ok(Request {
            method,
            path,
            headers,
            body,
        })
    }

    /// Formato: `GET /path?query HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        // El query string no participa en el ruteo
        let path = match parts[1].split_once('?') {
            Some((path, _)) => path.to_string(),
            None => parts[1].to_string(),
        };

        let version = parts[2];
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((method, path))
    }

    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request (sin normalizar)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
