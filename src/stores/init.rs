//! Implements the start-up storage selection.
//!
//! The selection runs exactly once, before the HTTP listener starts: first
//! the managed REST surface, then the direct database, then the in-memory
//! fallback. A backend is accepted only after answering a read probe within
//! its deadline; once active it is never re-evaluated for the lifetime of
//! the process, and probe failures never surface in a client response.

use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{
    Config, Error,
    stores::{MemoryStorage, RestStorage, SQLiteStorage, Storage},
};

const REST_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const DIRECT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// The backend chosen by the probe sequence.
#[derive(Debug)]
enum Backend {
    Rest(RestStorage),
    Direct(SQLiteStorage),
    Memory(MemoryStorage),
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Rest(_) => "REST API",
            Backend::Direct(_) => "direct database",
            Backend::Memory(_) => "in-memory",
        }
    }
}

/// Select a storage backend and return the resolved handle.
///
/// The handle is produced once and handed to the router by ownership; no
/// global state is involved and the choice is never revisited.
pub async fn initialize_storage(config: &Config) -> Arc<dyn Storage> {
    let backend = select_backend(config).await;

    tracing::info!("Storage initialized using the {} backend", backend.name());

    match backend {
        Backend::Rest(storage) => Arc::new(storage),
        Backend::Direct(storage) => Arc::new(storage),
        Backend::Memory(storage) => Arc::new(storage),
    }
}

async fn select_backend(config: &Config) -> Backend {
    let Some(database_url) = &config.database_url else {
        tracing::info!("DATABASE_URL is not configured, using in-memory storage");
        return Backend::Memory(MemoryStorage::new());
    };

    if let Some(rest_api_url) = &config.rest_api_url {
        let api_key = config.rest_api_key.as_deref().unwrap_or_default();

        match probe_rest(rest_api_url, api_key).await {
            Ok(storage) => return Backend::Rest(storage),
            Err(error) => tracing::warn!("REST storage probe failed: {error}"),
        }
    }

    match probe_direct(database_url).await {
        Ok(storage) => return Backend::Direct(storage),
        Err(error) => tracing::warn!("Direct database probe failed: {error}"),
    }

    tracing::warn!("All storage probes failed, falling back to in-memory storage");
    Backend::Memory(MemoryStorage::new())
}

async fn probe_rest(base_url: &str, api_key: &str) -> Result<RestStorage, Error> {
    let storage = RestStorage::new(base_url, api_key)?;
    read_probe(&storage, REST_PROBE_TIMEOUT).await?;

    Ok(storage)
}

async fn probe_direct(database_url: &str) -> Result<SQLiteStorage, Error> {
    // Opening the database doubles as the raw connectivity test: it fails
    // fast on an unreachable or unwritable path.
    let storage = SQLiteStorage::open(database_url)?;
    read_probe(&storage, DIRECT_PROBE_TIMEOUT).await?;

    Ok(storage)
}

async fn read_probe<S: Storage>(storage: &S, deadline: Duration) -> Result<(), Error> {
    match timeout(deadline, storage.get_all_expenses()).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(error)) => Err(error),
        Err(_) => Err(Error::ProbeTimeout(deadline)),
    }
}

#[cfg(test)]
mod initialize_storage_tests {
    use crate::Config;

    use super::{Backend, select_backend};

    fn temp_db_path(file: &tempfile::NamedTempFile) -> String {
        file.path().to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn no_connection_string_selects_memory() {
        let backend = select_backend(&Config::default()).await;

        assert!(matches!(backend, Backend::Memory(_)));
    }

    #[tokio::test]
    async fn connection_string_selects_the_direct_backend() {
        let db_file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            database_url: Some(temp_db_path(&db_file)),
            ..Default::default()
        };

        let backend = select_backend(&config).await;

        assert!(matches!(backend, Backend::Direct(_)));
    }

    #[tokio::test]
    async fn unreachable_rest_api_falls_back_to_the_direct_backend() {
        let db_file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            database_url: Some(temp_db_path(&db_file)),
            // Port 9 (discard) is closed on loopback; the connection is
            // refused well within the probe deadline.
            rest_api_url: Some("http://127.0.0.1:9".to_string()),
            rest_api_key: Some("secret".to_string()),
            ..Default::default()
        };

        let backend = select_backend(&config).await;

        assert!(matches!(backend, Backend::Direct(_)));
    }

    #[tokio::test]
    async fn unusable_database_path_falls_back_to_memory() {
        let config = Config {
            database_url: Some("/nonexistent-dir/expenses.db".to_string()),
            ..Default::default()
        };

        let backend = select_backend(&config).await;

        assert!(matches!(backend, Backend::Memory(_)));
    }
}
