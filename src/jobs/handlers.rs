//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! - `GET /jobs`  → listado (200 o 304)
//! - `POST /jobs` → alta (201 `{"success": true, "id": "..."}`)

use crate::error::ApiError;
use crate::http::codec::ResponseInit;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::types::ValidationError;
use crate::notify::{self, Notification};
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct CreatedReply<'a> {
    success: bool,
    id: &'a str,
}

/// Handler para `GET /jobs` (y `HEAD /jobs`)
pub fn list_handler(req: &Request, path: &str, state: &AppState) -> Result<Response, ApiError> {
    let jobs = state.store.list_jobs()?;
    tracing::debug!(count = jobs.len(), "listing jobs");

    Ok(state.codec.json(&jobs, Some(req), path, ResponseInit::default())?)
}

/// Handler para `POST /jobs`
///
/// # Body
/// ```json
/// {"title": "Welder", "company": "Acme", "location": "Austin",
///  "salary": "$25/hr", "type": "full-time", "description": "...",
///  "duration": "30 days", "workingPeriod": null, "contactPhone": null}
/// ```
pub fn create_handler(req: &Request, path: &str, state: &AppState) -> Result<Response, ApiError> {
    let fields: Value = serde_json::from_slice(req.body())
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    let job = state.store.create_job(&fields)?;

    // Después del commit; nunca afecta al response
    notify::dispatch(state.notifier.clone(), Notification::job_created(&job));

    let reply = CreatedReply {
        success: true,
        id: &job.id,
    };
    Ok(state
        .codec
        .json(&reply, Some(req), path, ResponseInit::status(StatusCode::Created))?)
}
