//! # Sistema de Jobs
//!
//! Ofertas de empleo: tipos y validación, generación de ids, persistencia
//! y los handlers HTTP.
//!
//! ## Endpoints
//!
//! - `GET /jobs`  - Listar ofertas (orden de inserción)
//! - `POST /jobs` - Publicar una oferta

pub mod handlers;
pub mod id;
pub mod storage;
pub mod store;
pub mod types;

pub use storage::{FileTable, JobTable, MemoryTable, StoreError};
pub use store::{CreateJobError, JobStore};
pub use types::{Job, NewJob, ValidationError};
