//! # Códigos de Estado HTTP
//!
//! Códigos que el servicio puede emitir. La API sólo expone fallos
//! 400, 404 y 500; el resto son respuestas de éxito o de caché.
//!
//! - **2xx**: Éxito (200 OK, 201 Created)
//! - **3xx**: 304 Not Modified (revalidación condicional con ETag)
//! - **4xx**: Error del cliente (400, 404)
//! - **5xx**: Error del servidor (500)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Se creó un recurso nuevo (POST /jobs)
    Created = 201,

    /// 304 Not Modified - El ETag del cliente sigue vigente
    NotModified = 304,

    /// 400 Bad Request - Body inválido o campo requerido faltante
    BadRequest = 400,

    /// 404 Not Found - Ruta no encontrada
    NotFound = 404,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use jobs_edge::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    ///
    /// # Ejemplo
    /// ```
    /// use jobs_edge::http::StatusCode;
    /// assert!(StatusCode::Created.is_success());
    /// assert!(!StatusCode::NotModified.is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }

    /// Indica si la respuesta nunca lleva body ni `Content-Length` propio (304)
    pub fn forbids_body(&self) -> bool {
        matches!(self, StatusCode::NotModified)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::NotModified.as_u16(), 304);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::NotModified.reason_phrase(), "Not Modified");
        assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    }

    #[test]
    fn test_status_classes() {
        assert!(StatusCode::Ok.is_success());
        assert!(StatusCode::Created.is_success());
        assert!(!StatusCode::NotModified.is_success());
        assert!(!StatusCode::NotFound.is_server_error());
        assert!(StatusCode::InternalServerError.is_server_error());
    }

    #[test]
    fn test_forbids_body() {
        assert!(StatusCode::NotModified.forbids_body());
        assert!(!StatusCode::Created.forbids_body());
        assert!(!StatusCode::Ok.forbids_body());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::NotModified.to_string(), "304 Not Modified");
        assert_eq!(StatusCode::InternalServerError.to_string(), "500 Internal Server Error");
    }
}
