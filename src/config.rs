//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servicio de jobs con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./jobs_edge --port 8787 \
//!   --storage file \
//!   --jobs-storage ./data/jobs.json \
//!   --jobs-max-age 600
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8787 STORAGE_MODE=memory RESEND_API_KEY=re_xxx NOTIFY_EMAIL=ops@acme.com ./jobs_edge
//! ```

use clap::{Parser, ValueEnum};

/// Backend de persistencia de jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageMode {
    /// Archivo JSON en disco (sobrevive reinicios)
    File,
    /// Tabla en memoria (se pierde al apagar)
    Memory,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::File => "file",
            StorageMode::Memory => "memory",
        }
    }
}

/// Configuración del servicio
#[derive(Debug, Clone, Parser)]
#[command(name = "jobs_edge")]
#[command(about = "Servicio HTTP de publicación de ofertas de empleo con caché condicional")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8787", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    // === Storage ===

    /// Backend de persistencia
    #[arg(long, value_enum, default_value = "file", env = "STORAGE_MODE")]
    pub storage: StorageMode,

    /// Ruta del archivo de persistencia de jobs (sólo con `--storage file`)
    #[arg(long = "jobs-storage", default_value = "./data/jobs.json", env = "JOBS_STORAGE")]
    pub jobs_storage_path: String,

    // === Caché ===

    /// max-age por defecto en segundos
    #[arg(long = "default-max-age", default_value = "3600", env = "DEFAULT_MAX_AGE")]
    pub default_max_age: u32,

    /// max-age de `/jobs` en segundos
    #[arg(long = "jobs-max-age", default_value = "600", env = "JOBS_MAX_AGE")]
    pub jobs_max_age: u32,

    // === Límites ===

    /// Tamaño máximo del body de un request
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Notificaciones ===

    /// API key de Resend; sin ella los avisos sólo van al log
    #[arg(long = "resend-api-key", env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Destinatario de los avisos de nuevos jobs
    #[arg(long = "notify-email", env = "NOTIFY_EMAIL")]
    pub notify_email: Option<String>,

    /// Remitente de los avisos
    #[arg(long = "notify-from", default_value = "Job Board <jobs@localhost>", env = "NOTIFY_FROM")]
    pub notify_from: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use jobs_edge::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8787");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ¿Hay proveedor de email configurado?
    pub fn email_enabled(&self) -> bool {
        self.resend_api_key.is_some() && self.notify_email.is_some()
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.storage == StorageMode::File && self.jobs_storage_path.trim().is_empty() {
            return Err("Jobs storage path must not be empty in file mode".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        // Key sin destinatario (o al revés) es casi seguro un error de deploy
        match (&self.resend_api_key, &self.notify_email) {
            (Some(_), None) => return Err("RESEND_API_KEY is set but NOTIFY_EMAIL is missing".to_string()),
            (None, Some(_)) => return Err("NOTIFY_EMAIL is set but RESEND_API_KEY is missing".to_string()),
            _ => {}
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║              Jobs Edge HTTP Service Configuration            ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Max body:     {} bytes", self.max_body_bytes);
        println!("   Read timeout: {} ms", self.read_timeout_ms);
        println!();
        println!("💾 Storage:");
        println!("   Mode:         {}", self.storage.as_str());
        if self.storage == StorageMode::File {
            println!("   File:         {}", self.jobs_storage_path);
        }
        println!();
        println!("🗄️  Cache-Control:");
        println!("   ┌──────────────┬─────────────┐");
        println!("   │ Path         │ max-age     │");
        println!("   ├──────────────┼─────────────┤");
        println!("   │ /jobs        │ {:>7} s   │", self.jobs_max_age);
        println!("   │ (default)    │ {:>7} s   │", self.default_max_age);
        println!("   └──────────────┴─────────────┘");
        println!();
        println!("✉️  Notifications:");
        match (&self.notify_email, self.email_enabled()) {
            (Some(to), true) => println!("   Resend →      {}", to),
            _ => println!("   Email:        disabled (log only)"),
        }
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8787,
            host: "127.0.0.1".to_string(),
            storage: StorageMode::File,
            jobs_storage_path: "./data/jobs.json".to_string(),
            default_max_age: 3600,
            jobs_max_age: 600,
            max_body_bytes: 1024 * 1024,
            read_timeout_ms: 5_000,
            resend_api_key: None,
            notify_email: None,
            notify_from: "Job Board <jobs@localhost>".to_string(),
        }
    }
}
