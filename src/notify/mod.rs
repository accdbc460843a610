//! # Notificaciones por Email
//! src/notify/mod.rs
//!
//! Aviso best-effort cuando se publica un job. Se despacha en un thread
//! propio después del commit: si falla se registra en el log y el request
//! que lo disparó no se entera.

pub mod resend;

use crate::config::Config;
use crate::jobs::Job;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub use resend::ResendNotifier;

/// Mensaje a enviar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html: String,
}

impl Notification {
    /// Aviso de "nuevo job publicado"
    pub fn job_created(job: &Job) -> Self {
        let subject = format!("New job posted: {} at {}", job.title, job.company);
        let html = format!(
            "<h2>{}</h2>\
             <p><strong>{}</strong> · {}</p>\
             <p>Salary: {} · Type: {} · Duration: {}</p>\
             <p>{}</p>\
             <p><small>id: {}</small></p>",
            escape_html(&job.title),
            escape_html(&job.company),
            escape_html(&job.location),
            escape_html(&job.salary),
            escape_html(&job.job_type),
            escape_html(&job.duration),
            escape_html(&job.description),
            job.id,
        );
        Self { subject, html }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Canal de salida de notificaciones
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier sin proveedor configurado: sólo deja constancia en el log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            subject = %notification.subject,
            "email not sent, RESEND_API_KEY/NOTIFY_EMAIL not configured"
        );
        Ok(())
    }
}

/// Elige el notifier según la configuración
pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match (&config.resend_api_key, &config.notify_email) {
        (Some(key), Some(to)) => {
            match ResendNotifier::new(key.clone(), config.notify_from.clone(), to.clone()) {
                Ok(notifier) => Arc::new(notifier),
                Err(e) => {
                    tracing::warn!(error = %e, "could not build email client, falling back to log notifier");
                    Arc::new(LogNotifier)
                }
            }
        }
        _ => Arc::new(LogNotifier),
    }
}

/// Envía en segundo plano (fire-and-forget)
///
/// El `JoinHandle` sólo sirve para tests; el servidor lo descarta.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) -> JoinHandle<()> {
    thread::spawn(move || match notifier.send(&notification) {
        Ok(()) => tracing::debug!(subject = %notification.subject, "notification delivered"),
        Err(e) => tracing::warn!(subject = %notification.subject, error = %e, "notification failed"),
    })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
