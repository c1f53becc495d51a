//! The one-shot commit handed to the host and the passes it runs.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::ConfigResult;
use crate::store::State;
use crate::target::{DispatchCounts, PrimaryTarget, dispatch};

/// Lifecycle of the store's commit trigger.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CommitState {
    /// No directive has been registered; no commit exists yet.
    #[default]
    Idle,
    /// The commit has been handed to the host but not applied.
    Armed,
    /// The commit has been applied.
    Applied,
}

/// Host hook receiving the store's single [`Commit`].
///
/// The store calls [`CommitHook::register_commit`] while holding its lock.
/// Implementations must keep the commit for later instead of applying it
/// inline.
pub trait CommitHook {
    /// Takes ownership of the commit to run during the host's
    /// configuration phase.
    fn register_commit(&mut self, commit: Commit);
}

/// Deferred application of every directive registered in a store.
///
/// The commit reads the store when [`Commit::apply`] runs, not when it was
/// created, so directives registered after the hand-out are included.
#[must_use = "a commit does nothing until it is applied"]
pub struct Commit {
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The store holds its lock while handing the commit to the hook.
        let mut out = f.debug_struct("Commit");
        match self.state.try_lock() {
            Some(state) => out.field("state", &state.commit),
            None => out.field("state", &format_args!("<locked>")),
        };
        out.finish_non_exhaustive()
    }
}

/// Summary of a completed commit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommitReport {
    /// Values delivered through dedicated setters.
    pub setter_calls: usize,
    /// Values delivered through the generic directive entry point.
    pub directive_calls: usize,
    /// Whether the provisioner was activated.
    pub provisioner_activated: bool,
    /// Extension units registered with the provisioner.
    pub units_registered: usize,
}

impl Commit {
    pub(crate) const fn new(state: Arc<Mutex<State>>) -> Self {
        Self { state }
    }

    /// Forwards every registered directive to `target`.
    ///
    /// General fields are applied first. Extension fields and units follow
    /// only when at least one extension unit was registered; in that case the
    /// target's provisioner is activated before anything is forwarded to it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Dispatch`] for the first value a target
    /// rejects; values after it are not applied.
    pub fn apply(self, target: &mut dyn PrimaryTarget) -> ConfigResult<CommitReport> {
        let (fields, extension_fields, units) = {
            let mut state = self.state.lock();
            state.commit = CommitState::Applied;
            (
                state.fields.clone(),
                state.extension_fields.clone(),
                state.units.clone(),
            )
        };

        let mut counts = DispatchCounts::default();
        let mut report = CommitReport::default();

        debug!(fields = fields.len(), "applying general fields");
        for (name, values) in fields.iter() {
            dispatch(&mut *target, name, values, &mut counts)?;
        }

        if units.is_empty() {
            if !extension_fields.is_empty() {
                warn!(
                    fields = extension_fields.len(),
                    "extension fields ignored: no extension unit registered"
                );
            }
        } else {
            debug!(units = units.len(), "activating provisioner");
            let provisioner = target.provisioner();
            provisioner.activate();
            report.provisioner_activated = true;
            for (name, values) in extension_fields.iter() {
                dispatch(&mut *provisioner, name, values, &mut counts)?;
            }
            for (name, params) in units.iter() {
                provisioner.merge_params(params.clone());
                provisioner.register_unit(name);
                report.units_registered += 1;
            }
        }

        report.setter_calls = counts.setter_calls;
        report.directive_calls = counts.directive_calls;
        debug!(?report, "commit applied");
        Ok(report)
    }
}

/// [`CommitHook`] that parks the commit until the host collects it.
///
/// Clones share the same slot, so one clone can be given to the store while
/// the host keeps another.
///
/// ```
/// use deferred_config::{CommitSlot, ConfigStore};
///
/// let slot = CommitSlot::new();
/// let store = ConfigStore::builder(slot.clone()).build();
/// assert!(slot.take().is_none());
///
/// store.set_field("box", "lucid32");
/// assert!(slot.take().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CommitSlot {
    inner: Arc<Mutex<SlotInner>>,
}

#[derive(Debug, Default)]
struct SlotInner {
    commit: Option<Commit>,
    registrations: usize,
}

impl CommitSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the parked commit.
    #[must_use]
    pub fn take(&self) -> Option<Commit> {
        self.inner.lock().commit.take()
    }

    /// Number of commits handed to this slot so far.
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.inner.lock().registrations
    }
}

impl CommitHook for CommitSlot {
    fn register_commit(&mut self, commit: Commit) {
        let mut inner = self.inner.lock();
        inner.registrations += 1;
        inner.commit = Some(commit);
    }
}
