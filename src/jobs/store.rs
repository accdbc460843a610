//! # Job Store
//! src/jobs/store.rs
//!
//! Fachada sobre la [`JobTable`]: valida, asigna id y persiste. Es lo único
//! que los handlers HTTP conocen de la persistencia.

use crate::config::{Config, StorageMode};
use crate::jobs::id::{generate_id, now_millis};
use crate::jobs::storage::{FileTable, JobTable, MemoryTable, StoreError};
use crate::jobs::types::{Job, NewJob, ValidationError};
use serde_json::Value;
use std::sync::Arc;

/// Resultado fallido de [`JobStore::create_job`]
#[derive(Debug, thiserror::Error)]
pub enum CreateJobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store de jobs compartido entre threads
#[derive(Clone)]
pub struct JobStore {
    table: Arc<dyn JobTable>,
}

impl JobStore {
    pub fn new(table: Arc<dyn JobTable>) -> Self {
        Self { table }
    }

    /// Elige el backend según `--storage`
    pub fn from_config(config: &Config) -> Self {
        let table: Arc<dyn JobTable> = match config.storage {
            StorageMode::File => Arc::new(FileTable::new(&config.jobs_storage_path)),
            StorageMode::Memory => Arc::new(MemoryTable::new()),
        };
        Self::new(table)
    }

    /// Store en memoria, útil para tests
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTable::new()))
    }

    /// Crea la tabla si no existe; barato después de la primera vez
    pub fn bootstrap(&self) -> Result<(), StoreError> {
        self.table.ensure_schema()
    }

    /// Todos los jobs en orden de inserción
    pub fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.table.select_all()
    }

    /// Valida `fields`, genera id y persiste
    ///
    /// Si la validación falla no se escribe nada.
    pub fn create_job(&self, fields: &Value) -> Result<Job, CreateJobError> {
        let draft = NewJob::from_value(fields)?;
        let job = draft.into_job(generate_id(), now_millis());

        self.table.insert(&job)?;
        tracing::info!(id = %job.id, title = %job.title, "job created");

        Ok(job)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        self.table.count()
    }
}
