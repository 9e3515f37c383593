//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::{AllowList, PaginationConfig, stores::Storage};

/// The state of the REST server.
///
/// The storage handle is resolved once at start-up and shared by reference;
/// the allow-list is owned here and injected into the authorization
/// endpoints rather than living in process-wide mutable state.
#[derive(Clone)]
pub struct AppState {
    /// The active storage backend.
    pub storage: Arc<dyn Storage>,
    /// The emails allowed through the authorization gate.
    pub allow_list: Arc<Mutex<AllowList>>,
    /// The config that controls how to page lists of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] around an already-selected storage backend.
    pub fn new(
        storage: Arc<dyn Storage>,
        allow_list: AllowList,
        pagination_config: PaginationConfig,
    ) -> Self {
        Self {
            storage,
            allow_list: Arc::new(Mutex::new(allow_list)),
            pagination_config,
        }
    }
}
