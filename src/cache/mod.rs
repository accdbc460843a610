//! # Caché HTTP
//!
//! - `policy`: lifetime (`max-age`) y revalidación por ruta
//! - `etag`: huella del body y evaluación de `If-None-Match`

pub mod etag;
pub mod policy;

pub use policy::{CacheDirective, CachePolicy, PathMatch};
