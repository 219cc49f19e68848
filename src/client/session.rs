use std::fmt;
use std::sync::Arc;

use super::error::StorageResult;
use super::storage::{KeyValueStore, TOKEN_KEY};

/// Bearer credential kept in the local store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> StorageResult<Option<String>> {
        Ok(self
            .store
            .get(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> StorageResult<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn sign_out(&self) -> StorageResult<()> {
        self.store.remove(TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }
}
