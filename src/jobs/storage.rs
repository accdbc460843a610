//! # Persistencia de Jobs
//! src/jobs/storage.rs
//!
//! Abstracción de "tabla" de sólo inserción y lectura ([`JobTable`]) con
//! dos backends:
//!
//! - [`FileTable`]: arreglo JSON en disco. Cada inserción reescribe un
//!   archivo temporal y lo renombra, así que un insert es atómico: o queda
//!   el registro completo o no queda nada.
//! - [`MemoryTable`]: `Vec` en memoria (modo local y tests).
//!
//! El orden de las filas es el orden de inserción; el listado no ordena
//! por `id`.

use crate::jobs::types::Job;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Fallas de la capa de persistencia
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Tabla de jobs: crear-si-no-existe, insertar, leer todo
pub trait JobTable: Send + Sync {
    /// Bootstrap idempotente del "esquema". Se llama en cada request.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Inserta una fila al final
    fn insert(&self, job: &Job) -> Result<(), StoreError>;

    /// Todas las filas en orden de inserción
    fn select_all(&self) -> Result<Vec<Job>, StoreError>;

    /// Número de filas
    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.select_all()?.len())
    }
}

/// Tabla respaldada por un archivo JSON
pub struct FileTable {
    /// Ruta al archivo de persistencia
    path: PathBuf,

    /// Cache de las filas; `None` hasta la primera carga
    rows: Mutex<Option<Vec<Job>>>,
}

impl FileTable {
    /// No toca el disco; la carga ocurre en el primer `ensure_schema`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Vec<Job>>>, StoreError> {
        self.rows.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Crea el archivo si falta y (re)carga la cache
    fn ensure_loaded<'a>(
        &self,
        guard: &'a mut MutexGuard<'_, Option<Vec<Job>>>,
    ) -> Result<&'a mut Vec<Job>, StoreError> {
        let on_disk = self.path.exists();

        if !on_disk {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Self::write_rows(&self.path, &[])?;
            tracing::info!(path = %self.path.display(), "created job table");
            **guard = Some(Vec::new());
        } else if guard.is_none() {
            let rows = Self::load_from_file(&self.path)?;
            tracing::debug!(path = %self.path.display(), rows = rows.len(), "loaded job table");
            **guard = Some(rows);
        }

        Ok(guard.get_or_insert_with(Vec::new))
    }

    /// Carga filas desde el archivo. Un archivo vacío es una tabla vacía;
    /// uno corrupto es un error (no se descarta en silencio).
    fn load_from_file(path: &Path) -> Result<Vec<Job>, StoreError> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Escribe las filas: archivo temporal + rename
    fn write_rows(path: &Path, rows: &[Job]) -> Result<(), StoreError> {
        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        // Renombrar (atómico en sistemas Unix)
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl JobTable for FileTable {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        self.ensure_loaded(&mut guard)?;
        Ok(())
    }

    /// Reescribe el arreglo completo en cada alta: O(n) por insert, aceptable
    /// para un tablero de cientos de ofertas.
    fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let rows = self.ensure_loaded(&mut guard)?;

        rows.push(job.clone());
        if let Err(e) = Self::write_rows(&self.path, rows) {
            // Sin commit en disco, tampoco en memoria
            rows.pop();
            return Err(e);
        }

        Ok(())
    }

    fn select_all(&self) -> Result<Vec<Job>, StoreError> {
        let mut guard = self.lock()?;
        Ok(self.ensure_loaded(&mut guard)?.clone())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        Ok(self.ensure_loaded(&mut guard)?.len())
    }
}

/// Tabla en memoria
#[derive(Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<Job>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobTable for MemoryTable {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn insert(&self, job: &Job) -> Result<(), StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(job.clone());
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.rows.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            title: "Welder".to_string(),
            company: "Acme".to_string(),
            location: "Austin".to_string(),
            salary: "$25/hr".to_string(),
            job_type: "full-time".to_string(),
            description: "...".to_string(),
            duration: "30 days".to_string(),
            working_period: None,
            contact_phone: Some("555-0100".to_string()),
            created_at: 1,
        }
    }

    // ==================== FileTable ====================

    #[test]
    fn test_ensure_schema_creates_file_and_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/jobs.json");
        let table = FileTable::new(&path);

        table.ensure_schema().unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");

        // Idempotente
        table.ensure_schema().unwrap();
        assert_eq!(table.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_select_keep_insertion_order() {
        let dir = tempdir().unwrap();
        let table = FileTable::new(dir.path().join("jobs.json"));
        table.ensure_schema().unwrap();

        for id in ["zzz", "aaa", "mmm"] {
            table.insert(&job(id)).unwrap();
        }

        let ids: Vec<String> = table.select_all().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn test_persistence_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        {
            let table = FileTable::new(&path);
            table.insert(&job("persist-1")).unwrap();
        }

        let table = FileTable::new(&path);
        let rows = table.select_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], job("persist-1"));
    }

    #[test]
    fn test_file_recreated_after_external_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let table = FileTable::new(&path);
        table.insert(&job("a")).unwrap();

        fs::remove_file(&path).unwrap();
        table.ensure_schema().unwrap();

        assert!(path.exists());
        assert_eq!(table.count().unwrap(), 0);
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        fs::write(&path, b"{ this is not valid json }").unwrap();

        let table = FileTable::new(&path);
        assert!(matches!(table.ensure_schema(), Err(StoreError::Corrupt(_))));
        // El archivo no se pisa
        assert_eq!(fs::read(&path).unwrap(), b"{ this is not valid json }");
    }

    #[test]
    fn test_empty_file_is_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        fs::write(&path, b"").unwrap();

        let table = FileTable::new(&path);
        assert_eq!(table.count().unwrap(), 0);
    }

    #[test]
    fn test_failed_write_leaves_no_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let table = FileTable::new(&path);
        table.insert(&job("a")).unwrap();

        // Un directorio en la ruta del temporal hace fallar File::create
        fs::create_dir(dir.path().join("jobs.json.tmp")).unwrap();

        assert!(matches!(table.insert(&job("b")), Err(StoreError::Io(_))));
        assert_eq!(table.count().unwrap(), 1);
    }

    // ==================== MemoryTable ====================

    #[test]
    fn test_memory_table() {
        let table = MemoryTable::new();
        table.ensure_schema().unwrap();
        assert_eq!(table.count().unwrap(), 0);

        table.insert(&job("b")).unwrap();
        table.insert(&job("a")).unwrap();

        let ids: Vec<String> = table.select_all().unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
