//! Deferred, apply-once aggregation of configuration directives.
//!
//! Declaration sites register directives into a [`ConfigStore`] in any order.
//! The first directive hands a [`Commit`] to the host's [`CommitHook`]; when
//! the host later applies that commit, every directive registered up to that
//! point is forwarded to the host's [`PrimaryTarget`], and extension units are
//! forwarded to its provisioner.
//!
//! ```rust
//! use deferred_config::{CommitSlot, ConfigStore};
//! use serde_json::json;
//!
//! let slot = CommitSlot::new();
//! let store = ConfigStore::builder(slot.clone()).build();
//! store.set_box_image("lucid32");
//! store.forward_route("web", 80, 8080);
//!
//! assert_eq!(slot.registrations(), 1);
//! assert_eq!(store.field("forward_port"), Some(vec![json!(["web", 80, 8080])]));
//! ```

mod commit;
mod error;
mod fields;
mod platform;
mod probe;
mod settings;
mod store;
mod target;

pub use commit::{Commit, CommitHook, CommitReport, CommitSlot, CommitState};
pub use error::{ConfigError, ConfigResult};
pub use fields::{FieldMap, UnitTable};
pub use platform::{HostPlatform, PlatformFlag, PlatformProbe};
pub use probe::{AmbientDirectoryProbe, DirectoryProbe};
pub use settings::{ENV_PREFIX, StoreSettings};
pub use store::{ConfigStore, ConfigStoreBuilder};
pub use target::{
    ConfigTarget, FieldCapability, Params, PrimaryTarget, ProvisionerTarget, TargetError,
    positional_args,
};
