//! The configuration store collecting directives from declaration sites.
//!
//! Every registration runs as one critical section over the store's state.
//! The first general field registered hands a [`Commit`] to the host's
//! [`CommitHook`]; that happens once per store, however many directives
//! follow.

mod global;

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::commit::{Commit, CommitHook, CommitState};
use crate::fields::{FieldMap, UnitTable};
use crate::platform::{HostPlatform, PlatformFlag, PlatformProbe};
use crate::probe::{AmbientDirectoryProbe, DirectoryProbe};
use crate::{ConfigError, ConfigResult, Params, StoreSettings};

/// Mutable state shared between the store and its commit.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) fields: FieldMap,
    pub(crate) extension_fields: FieldMap,
    pub(crate) units: UnitTable,
    pub(crate) platform: PlatformFlag,
    pub(crate) commit: CommitState,
}

/// Accumulates configuration directives and hands out a single commit.
///
/// Construct one with [`ConfigStore::builder`], or install a process-wide
/// instance with [`ConfigStore::init_global`].
pub struct ConfigStore {
    state: Arc<Mutex<State>>,
    hook: Mutex<Box<dyn CommitHook + Send>>,
    platform: Box<dyn PlatformProbe>,
    directories: Box<dyn DirectoryProbe>,
    settings: StoreSettings,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("state", &*self.state.lock())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConfigStore`].
pub struct ConfigStoreBuilder {
    hook: Box<dyn CommitHook + Send>,
    platform: Box<dyn PlatformProbe>,
    directories: Box<dyn DirectoryProbe>,
    settings: StoreSettings,
}

impl ConfigStoreBuilder {
    /// Replaces the platform probe consulted by the first folder share.
    #[must_use]
    pub fn platform(mut self, probe: impl PlatformProbe + 'static) -> Self {
        self.platform = Box::new(probe);
        self
    }

    /// Replaces the probe validating extension source paths.
    #[must_use]
    pub fn directories(mut self, probe: impl DirectoryProbe + 'static) -> Self {
        self.directories = Box::new(probe);
        self
    }

    /// Replaces the default [`StoreSettings`].
    #[must_use]
    pub fn settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds an empty store.
    #[must_use]
    pub fn build(self) -> ConfigStore {
        ConfigStore {
            state: Arc::new(Mutex::new(State::default())),
            hook: Mutex::new(self.hook),
            platform: self.platform,
            directories: self.directories,
            settings: self.settings,
        }
    }
}

impl ConfigStore {
    /// Starts building a store that hands its commit to `hook`.
    ///
    /// The store probes the host platform, checks directories on the ambient
    /// filesystem and uses [`StoreSettings::default`] unless told otherwise.
    #[must_use]
    pub fn builder(hook: impl CommitHook + Send + 'static) -> ConfigStoreBuilder {
        ConfigStoreBuilder {
            hook: Box::new(hook),
            platform: Box::new(HostPlatform),
            directories: Box::new(AmbientDirectoryProbe),
            settings: StoreSettings::default(),
        }
    }

    /// Appends `value` to the field `name`.
    ///
    /// The first call on an empty store hands the commit to the host hook
    /// before the value is stored.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) {
        let mut state = self.state.lock();
        self.push_field(&mut state, name, value.into());
    }

    /// Registers a forwarded port as `forward_port = [label, source, dest]`.
    pub fn forward_route(&self, label: &str, source_port: u16, dest_port: u16) {
        self.set_field("forward_port", json!([label, source_port, dest_port]));
    }

    /// Registers the base box `name` with an empty download URL.
    pub fn set_box_image(&self, name: &str) {
        self.set_box_image_from(name, "");
    }

    /// Registers the base box `name` and the `url` it is fetched from.
    pub fn set_box_image_from(&self, name: &str, url: &str) {
        let mut state = self.state.lock();
        self.push_field(&mut state, "box", Value::from(name));
        self.push_field(&mut state, "box_url", Value::from(url));
    }

    /// Shares `host_path` with the guest at `guest_path`, without options.
    pub fn share_folder(&self, label: &str, guest_path: &str, host_path: &str) {
        self.share_folder_with(label, guest_path, host_path, Params::new());
    }

    /// Shares `host_path` with the guest at `guest_path`.
    ///
    /// The first share resolves the platform flag. On the NFS platform that
    /// first share also registers the host-only `"network"` address, and
    /// every share carries the NFS option merged into `options`.
    pub fn share_folder_with(
        &self,
        label: &str,
        guest_path: &str,
        host_path: &str,
        mut options: Params,
    ) {
        let mut state = self.state.lock();
        if self.resolve_platform(&mut state) {
            options.insert(self.settings.nfs_option.clone(), Value::Bool(true));
        }
        let share = json!([label, guest_path, host_path, Value::Object(options)]);
        self.push_field(&mut state, "share_folder", share);
    }

    /// Appends `value` to the extension field `name`.
    ///
    /// Extension fields never hand out the commit on their own.
    pub fn set_extension_field(&self, name: &str, value: impl Into<Value>) {
        let mut state = self.state.lock();
        warn_if_applied(&state, name);
        state.extension_fields.push(name, value.into());
    }

    /// Adds `path` to the extension `sourcePaths`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArgument`] when `path` is not an existing
    /// directory. Nothing is registered in that case.
    pub fn add_extension_source_path(&self, path: impl AsRef<Utf8Path>) -> ConfigResult<()> {
        let dir = path.as_ref();
        if !self.directories.is_directory(dir) {
            return Err(ConfigError::invalid_argument(
                "path",
                format!("'{dir}' is not an existing directory"),
            ));
        }
        self.set_extension_field("sourcePaths", dir.as_str());
        Ok(())
    }

    /// Adds the extension unit `name`, merging `params` into any parameters
    /// it already has.
    pub fn add_extension_unit(&self, name: &str, params: Params) {
        let mut state = self.state.lock();
        warn_if_applied(&state, name);
        state.units.add(name, params);
    }

    /// Values registered for the general field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Vec<Value>> {
        self.state.lock().fields.get(name).map(<[Value]>::to_vec)
    }

    /// Values registered for the extension field `name`.
    #[must_use]
    pub fn extension_field(&self, name: &str) -> Option<Vec<Value>> {
        self.state
            .lock()
            .extension_fields
            .get(name)
            .map(<[Value]>::to_vec)
    }

    /// Parameters accumulated for the extension unit `name`.
    #[must_use]
    pub fn extension_unit(&self, name: &str) -> Option<Params> {
        self.state.lock().units.get(name).cloned()
    }

    /// Current value of the platform flag.
    #[must_use]
    pub fn platform_flag(&self) -> PlatformFlag {
        self.state.lock().platform
    }

    /// Current state of the commit trigger.
    #[must_use]
    pub fn commit_state(&self) -> CommitState {
        self.state.lock().commit
    }

    /// Settings the store was built with.
    #[must_use]
    pub const fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// JSON view of every pending directive.
    ///
    /// ```
    /// use deferred_config::{CommitSlot, ConfigStore};
    /// use serde_json::json;
    ///
    /// let store = ConfigStore::builder(CommitSlot::new()).build();
    /// store.set_field("x", 1);
    /// assert_eq!(store.snapshot()["fields"], json!({"x": [1]}));
    /// ```
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let state = self.state.lock();
        json!({
            "fields": state.fields.to_value(),
            "extension_fields": state.extension_fields.to_value(),
            "extension_units": state.units.to_value(),
        })
    }

    fn push_field(&self, state: &mut State, name: &str, value: Value) {
        if state.fields.is_empty() && state.commit == CommitState::Idle {
            state.commit = CommitState::Armed;
            debug!(field = name, "first directive registered; handing commit to host");
            self.hook
                .lock()
                .register_commit(Commit::new(Arc::clone(&self.state)));
        }
        warn_if_applied(state, name);
        state.fields.push(name, value);
    }

    /// Resolves the platform flag on first use and reports whether NFS
    /// sharing is enabled.
    fn resolve_platform(&self, state: &mut State) -> bool {
        if state.platform == PlatformFlag::Unset {
            let platform_id = self.platform.platform_id();
            state.platform = PlatformFlag::resolve(&platform_id, &self.settings.nfs_platform);
            debug!(platform = %platform_id, flag = ?state.platform, "resolved platform flag");
            if state.platform.is_enabled() {
                let address = Value::from(self.settings.host_only_address.as_str());
                self.push_field(state, "network", address);
            }
        }
        state.platform.is_enabled()
    }
}

fn warn_if_applied(state: &State, name: &str) {
    if state.commit == CommitState::Applied {
        warn!(
            directive = name,
            "directive registered after the commit was applied; it will not reach the target"
        );
    }
}
