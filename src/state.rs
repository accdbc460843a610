//! Estado compartido por todas las conexiones.

use crate::cache::CachePolicy;
use crate::config::Config;
use crate::http::codec::JsonCodec;
use crate::jobs::JobStore;
use crate::notify::{self, LogNotifier, Notifier};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub codec: JsonCodec,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: JobStore, codec: JsonCodec, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            codec,
            notifier,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            JobStore::from_config(config),
            JsonCodec::new(Arc::new(CachePolicy::from_config(config))),
            notify::from_config(config),
        )
    }

    /// Store en memoria, política por defecto y notifier de log
    pub fn in_memory() -> Self {
        Self::new(
            JobStore::in_memory(),
            JsonCodec::new(Arc::new(CachePolicy::default())),
            Arc::new(LogNotifier),
        )
    }
}
