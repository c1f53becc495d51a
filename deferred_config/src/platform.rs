//! Platform identity and the tri-state flag gating NFS folder sharing.

/// Source of the host platform identifier.
pub trait PlatformProbe: Send + Sync {
    /// Returns the identifier of the platform the host tool runs on.
    fn platform_id(&self) -> String;
}

/// Probe reporting the platform this binary was compiled for.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostPlatform;

impl PlatformProbe for HostPlatform {
    fn platform_id(&self) -> String {
        std::env::consts::OS.to_owned()
    }
}

/// Whether shared folders use NFS on this host.
///
/// The flag starts [`PlatformFlag::Unset`] and is resolved once; it never
/// changes afterwards.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PlatformFlag {
    /// Not resolved yet.
    #[default]
    Unset,
    /// The host is the NFS platform.
    Enabled,
    /// The host is any other platform.
    Disabled,
}

impl PlatformFlag {
    /// Resolves the flag by comparing `platform_id` with `nfs_platform`.
    #[must_use]
    pub fn resolve(platform_id: &str, nfs_platform: &str) -> Self {
        if platform_id == nfs_platform {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Whether the flag resolved to [`PlatformFlag::Enabled`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}
