//! # ETags
//! src/cache/etag.rs
//!
//! Huella determinista del body serializado: SHA-256 truncado a 64 bits,
//! en hex y entre comillas (`"3f2a..."`). No necesita ser criptográfica,
//! sólo estable y con colisiones improbables.

use sha2::{Digest, Sha256};

/// Bytes del digest que se conservan (16 caracteres hex)
const ETAG_BYTES: usize = 8;

/// Calcula el ETag (ya entre comillas) de un body
///
/// # Ejemplo
/// ```
/// use jobs_edge::cache::etag::fingerprint;
///
/// let a = fingerprint(b"[]");
/// assert_eq!(a, fingerprint(b"[]"));
/// assert_eq!(a.len(), 18);
/// ```
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hex: String = digest[..ETAG_BYTES]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("\"{}\"", hex)
}

/// Evalúa `If-None-Match` contra el ETag actual
///
/// Acepta `*`, listas separadas por coma y la forma débil `W/"..."`
/// (comparación débil, RFC 9110 §13.1.2).
pub fn if_none_match(header: &str, etag: &str) -> bool {
    let header = header.trim();
    if header == "*" {
        return true;
    }

    let current = strip_weak(etag);
    header
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .any(|candidate| strip_weak(candidate) == current)
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
