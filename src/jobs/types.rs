//! # Tipos del Sistema de Jobs
//! src/jobs/types.rs
//!
//! Define el registro persistido ([`Job`]) y el paso de decodificación que
//! convierte un body JSON arbitrario en un [`NewJob`] válido. La validación
//! falla cerrada: un campo ausente, vacío o de tipo incorrecto rechaza el
//! request completo antes de cualquier escritura.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Campos requeridos, en el orden en que se validan
pub const REQUIRED_FIELDS: [&str; 7] = [
    "title",
    "company",
    "location",
    "salary",
    "type",
    "description",
    "duration",
];

/// Oferta de empleo persistida
///
/// Los opcionales se serializan como `null`, nunca se omiten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Identificador opaco asignado por el store
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub duration: String,
    pub working_period: Option<String>,
    pub contact_phone: Option<String>,
    /// Milisegundos desde Unix epoch
    pub created_at: u64,
}

/// Errores de validación del body de creación
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// El body no es JSON
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),

    /// El body es JSON pero no un objeto
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// Campo requerido ausente, `null` o vacío
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Campo presente con un tipo que no corresponde
    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),
}

/// Datos validados de un job todavía sin `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    pub description: String,
    pub duration: String,
    pub working_period: Option<String>,
    pub contact_phone: Option<String>,
    /// `createdAt` enviado por el cliente, si lo hubo
    pub created_at: Option<u64>,
}

impl NewJob {
    /// Decodifica un body crudo
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Valida un valor JSON ya parseado
    ///
    /// Los requeridos se revisan en el orden de [`REQUIRED_FIELDS`] y se
    /// reporta el primero que falle.
    ///
    /// # Ejemplo
    /// ```
    /// use jobs_edge::jobs::types::{NewJob, ValidationError};
    /// use serde_json::json;
    ///
    /// let err = NewJob::from_value(&json!({"title": "Welder"})).unwrap_err();
    /// assert_eq!(err, ValidationError::MissingField("company"));
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = value.as_object().ok_or(ValidationError::NotAnObject)?;

        Ok(Self {
            title: required(fields, "title")?,
            company: required(fields, "company")?,
            location: required(fields, "location")?,
            salary: required(fields, "salary")?,
            job_type: required(fields, "type")?,
            description: required(fields, "description")?,
            duration: required(fields, "duration")?,
            working_period: optional(fields, "workingPeriod")?,
            contact_phone: optional(fields, "contactPhone")?,
            created_at: timestamp(fields, "createdAt")?,
        })
    }

    /// Completa el registro con el id generado y la hora del servidor
    pub fn into_job(self, id: String, now_ms: u64) -> Job {
        Job {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            salary: self.salary,
            job_type: self.job_type,
            description: self.description,
            duration: self.duration,
            working_period: self.working_period,
            contact_phone: self.contact_phone,
            created_at: self.created_at.unwrap_or(now_ms),
        }
    }
}

fn required(fields: &Map<String, Value>, name: &'static str) -> Result<String, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name)),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingField(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::InvalidField(name)),
    }
}

fn optional(fields: &Map<String, Value>, name: &'static str) -> Result<Option<String>, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidField(name)),
    }
}

fn timestamp(fields: &Map<String, Value>, name: &'static str) -> Result<Option<u64>, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or(ValidationError::InvalidField(name)),
    }
}
