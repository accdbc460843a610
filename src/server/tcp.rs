//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread: se lee un request completo
//! (headers + `Content-Length` bytes de body), se despacha y se cierra.

use crate::config::Config;
use crate::http::request::{content_length, header_end, ParseError};
use crate::http::Request;
use crate::router::Router;
use crate::state::AppState;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Límite de la sección de headers
pub const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Resultado de leer un request del socket
#[derive(Debug)]
enum Incoming {
    /// El peer cerró sin mandar nada
    Closed,
    /// Bytes crudos listos para parsear
    Raw(Vec<u8>),
    /// Se cortó la lectura antes de parsear
    Rejected(ParseError),
}

/// Límites de lectura por conexión
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_body_bytes: usize,
    read_timeout: Duration,
}

impl Limits {
    fn from_config(config: &Config) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes,
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }
}

/// Servidor HTTP concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    state: Arc<AppState>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let state = AppState::from_config(&config);
        Self::with_state(config, state)
    }

    /// Servidor con un estado ya armado (tests, backends alternativos)
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            router: Arc::new(Router::with_job_routes()),
            state: Arc::new(state),
            listener: None,
        }
    }

    /// Hace bind y retorna la dirección real (útil con puerto 0)
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return listener.local_addr();
        }

        let listener = TcpListener::bind(self.config.address())?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    pub fn run(&mut self) -> io::Result<()> {
        let addr = self.bind()?;
        tracing::info!(%addr, storage = self.config.storage.as_str(), "server listening");

        if let Err(e) = self.state.store.bootstrap() {
            // No es fatal: cada request reintenta el bootstrap y responde 500
            tracing::warn!(error = %e, "storage bootstrap failed at startup");
        }

        let listener = match &self.listener {
            Some(listener) => listener,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "listener not bound")),
        };
        let limits = Limits::from_config(&self.config);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let state = Arc::clone(&self.state);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router, &state, limits) {
                            tracing::warn!(error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        mut stream: TcpStream,
        router: &Router,
        state: &AppState,
        limits: Limits,
    ) -> io::Result<()> {
        let start = Instant::now();
        let request_id = format!("{:016x}", rand::random::<u64>());
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let span = tracing::info_span!("request", id = %&request_id[..8], %peer);
        let _guard = span.enter();

        stream.set_read_timeout(Some(limits.read_timeout))?;

        let (mut response, method, path) = match Self::read_request(&mut stream, limits.max_body_bytes)? {
            Incoming::Closed => {
                tracing::debug!("connection closed without data");
                return Ok(());
            }
            Incoming::Rejected(e) => {
                tracing::warn!(error = %e, "request rejected while reading");
                (router.reject(&e, state), "-".to_string(), "-".to_string())
            }
            Incoming::Raw(bytes) => match Request::parse(&bytes) {
                Ok(request) => {
                    let method = request.method().as_str().to_string();
                    let path = request.path().to_string();
                    (router.route(&request, state), method, path)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "parse error");
                    (router.reject(&e, state), "-".to_string(), "-".to_string())
                }
            },
        };

        response.add_header("X-Request-Id", &request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        tracing::info!(
            %method,
            %path,
            status = response.status().as_u16(),
            latency_ms = latency.as_secs_f64() * 1000.0,
            "request served"
        );

        Ok(())
    }

    /// Lee headers y, si hay `Content-Length`, exactamente ese body
    fn read_request(stream: &mut TcpStream, max_body_bytes: usize) -> io::Result<Incoming> {
        let mut buffer = Vec::with_capacity(4096);
        let mut chunk = [0u8; 8192];

        loop {
            let n = match stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    tracing::debug!(received = buffer.len(), "read timed out");
                    break;
                }
                Err(e) => return Err(e),
            };
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            match header_end(&buffer) {
                Some(end) => {
                    let expected = match content_length(&buffer[..end]) {
                        Ok(length) => length.unwrap_or(0),
                        Err(e) => return Ok(Incoming::Rejected(e)),
                    };
                    if expected > max_body_bytes {
                        return Ok(Incoming::Rejected(ParseError::BodyTooLarge(max_body_bytes)));
                    }
                    if buffer.len() >= end + expected {
                        break;
                    }
                }
                None if buffer.len() > MAX_HEADER_BYTES => {
                    return Ok(Incoming::Rejected(ParseError::InvalidHeader(
                        "header section too large".to_string(),
                    )));
                }
                None => {}
            }
        }

        if buffer.is_empty() {
            Ok(Incoming::Closed)
        } else {
            Ok(Incoming::Raw(buffer))
        }
    }
}
