//! Tunable constants of the store.
//!
//! Defaults match the conventional single-machine development setup. They
//! can be overridden through `DEFERRED_CONFIG_*` environment variables.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Prefix of the environment variables read by [`StoreSettings::load`].
pub const ENV_PREFIX: &str = "DEFERRED_CONFIG_";

/// Settings controlling the NFS folder-sharing behaviour.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Platform identifier that enables NFS sharing.
    pub nfs_platform: String,
    /// Host-only address registered under `"network"` when NFS is enabled.
    pub host_only_address: String,
    /// Option key merged into shared-folder options when NFS is enabled.
    pub nfs_option: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            nfs_platform: String::from("macos"),
            host_only_address: String::from("33.33.33.10"),
            nfs_option: String::from("nfs"),
        }
    }
}

impl StoreSettings {
    /// Layers `DEFERRED_CONFIG_*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] when an environment value cannot be
    /// extracted.
    pub fn load() -> ConfigResult<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(ConfigError::settings)
    }
}
