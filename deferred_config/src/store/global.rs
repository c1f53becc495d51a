//! Process-wide access point for hosts that load declarations from many
//! independent sites.

use std::sync::OnceLock;

use super::ConfigStore;
use crate::{ConfigError, ConfigResult};

static GLOBAL: OnceLock<ConfigStore> = OnceLock::new();

impl ConfigStore {
    /// Installs `store` as the process-wide store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyInitialised`] when a global store already
    /// exists; the supplied store is dropped.
    pub fn init_global(store: Self) -> ConfigResult<&'static Self> {
        GLOBAL
            .set(store)
            .map_err(|_rejected| ConfigError::AlreadyInitialised)?;
        GLOBAL.get().ok_or(ConfigError::AlreadyInitialised)
    }

    /// Returns the process-wide store, creating it with `init` on first use.
    ///
    /// `init` runs at most once per process.
    pub fn global_or_init(init: impl FnOnce() -> Self) -> &'static Self {
        GLOBAL.get_or_init(init)
    }

    /// Returns the process-wide store if one has been created.
    #[must_use]
    pub fn try_global() -> Option<&'static Self> {
        GLOBAL.get()
    }
}
