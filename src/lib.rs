//! # Jobs Edge
//! src/lib.rs
//!
//! Servicio HTTP de ofertas de empleo implementado sobre `std::net`, sin
//! framework web: un thread por conexión, JSON con ETag y `cache-control`
//! por ruta, CORS abierto y avisos por email best-effort.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, responses y el codec JSON con caché condicional
//! - `cache`: Política de `max-age` por ruta y cálculo de ETags
//! - `jobs`: Validación, ids, persistencia y handlers de `/jobs`
//! - `notify`: Notificaciones por email (Resend o sólo log)
//! - `router`: Dispatcher (preflight, 404, errores, panics)
//! - `server`: Listener TCP y lectura de requests
//! - `config` / `state` / `error`: Configuración, estado compartido y errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use jobs_edge::config::Config;
//! use jobs_edge::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod notify;
pub mod router;
pub mod server;
pub mod state;
