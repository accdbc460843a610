//! # Jobs Edge - Entry Point
//! src/main.rs
//!
//! Lee la configuración (CLI + env), instala el logger y arranca el servidor.

use jobs_edge::config::Config;
use jobs_edge::server::Server;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::new();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    config.print_summary();

    let mut server = Server::new(config);

    // Bloquea el thread principal
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}
