//! # Generación de IDs
//! src/jobs/id.rs
//!
//! `<12 caracteres base36 aleatorios><timestamp ms en base36>`
//!
//! La parte aleatoria sale de `rand::thread_rng` (~62 bits).

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Caracteres aleatorios al inicio del id
const RANDOM_CHARS: usize = 12;

/// Genera un id nuevo
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id: String = (0..RANDOM_CHARS)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    id.push_str(&to_base36(now_millis()));
    id
}

/// Milisegundos desde Unix epoch (0 si el reloj está antes de 1970)
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
