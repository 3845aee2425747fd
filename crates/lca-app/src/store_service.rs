//! Opening the model store a project points at.

use std::time::Duration;

use lca_project::StoreDef;
use lca_store::{IpcClient, MemoryStore, ModelStore};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Command-line overrides for the configured store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOverride {
    /// Use an in-process store regardless of configuration.
    pub memory: bool,
    /// Replace the configured IPC port.
    pub port: Option<u16>,
}

/// Open the store once for the whole run.
pub fn open_store(def: &StoreDef, overrides: StoreOverride) -> AppResult<Box<dyn ModelStore>> {
    if overrides.memory {
        info!("using in-memory model store");
        return Ok(Box::new(MemoryStore::with_reference_data()));
    }
    match def {
        StoreDef::Memory => {
            info!("using in-memory model store");
            Ok(Box::new(MemoryStore::with_reference_data()))
        }
        StoreDef::Ipc {
            host,
            port,
            timeout_s,
        } => {
            let port = overrides.port.unwrap_or(*port);
            let timeout = timeout_s
                .map(|t| {
                    Duration::try_from_secs_f64(t).map_err(|e| {
                        AppError::Validation(format!("store.timeout_s = {t}: {e}"))
                    })
                })
                .transpose()?;
            let client = IpcClient::connect(host, port, timeout)?;
            info!(endpoint = client.endpoint(), "using IPC model store");
            Ok(Box::new(client))
        }
    }
}
