//! Targets that record the calls a commit makes against them.
//!
//! Both targets answer [`FieldCapability::Setter`] for the field names they
//! were configured with and [`FieldCapability::Directive`] for everything
//! else, so tests can exercise both dispatch paths.
//!
//! # Examples
//!
//! ```
//! use deferred_config::{CommitSlot, ConfigStore};
//! use deferred_config_test_helpers::{Call, RecordingTarget};
//!
//! let slot = CommitSlot::new();
//! let store = ConfigStore::builder(slot.clone()).build();
//! store.set_field("box", "img");
//!
//! let mut target = RecordingTarget::with_setters(["box"]);
//! slot.take().expect("commit handed out").apply(&mut target).expect("apply");
//! assert_eq!(target.calls(), [Call::set("box", "img")]);
//! ```

use std::collections::BTreeSet;

use deferred_config::{
    ConfigTarget, FieldCapability, Params, PrimaryTarget, ProvisionerTarget, TargetError,
};
use serde_json::Value;

/// One call observed by a recording target.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    /// Dedicated setter invocation.
    Set {
        /// Field name.
        field: String,
        /// Value passed to the setter.
        value: Value,
    },
    /// Generic directive invocation.
    Directive {
        /// Directive name.
        field: String,
        /// Positional arguments.
        args: Vec<Value>,
    },
    /// Provisioner activation.
    Activate,
    /// Parameter merge on the provisioner.
    MergeParams(Params),
    /// Unit registration on the provisioner.
    RegisterUnit(String),
}

impl Call {
    /// Shorthand for a [`Call::Set`].
    #[must_use]
    pub fn set(field: &str, value: impl Into<Value>) -> Self {
        Self::Set {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    /// Shorthand for a [`Call::Directive`].
    #[must_use]
    pub fn directive<I, V>(field: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Directive {
            field: field.to_owned(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default)]
struct Recorder {
    setters: BTreeSet<String>,
    rejected: BTreeSet<String>,
    calls: Vec<Call>,
}

impl Recorder {
    fn capability(&self, field: &str) -> FieldCapability {
        if self.setters.contains(field) {
            FieldCapability::Setter
        } else {
            FieldCapability::Directive
        }
    }

    fn check(&self, field: &str) -> Result<(), TargetError> {
        if self.rejected.contains(field) {
            Err(format!("target rejected '{field}'").into())
        } else {
            Ok(())
        }
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), TargetError> {
        self.check(field)?;
        self.calls.push(Call::Set {
            field: field.to_owned(),
            value,
        });
        Ok(())
    }

    fn apply_directive(&mut self, field: &str, args: &[Value]) -> Result<(), TargetError> {
        self.check(field)?;
        self.calls.push(Call::Directive {
            field: field.to_owned(),
            args: args.to_vec(),
        });
        Ok(())
    }
}

/// Provisioner double owned by a [`RecordingTarget`].
#[derive(Debug, Default)]
pub struct RecordingProvisioner {
    recorder: Recorder,
    params: Params,
}

impl RecordingProvisioner {
    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.recorder.calls
    }

    /// Number of times [`ProvisionerTarget::activate`] was called.
    #[must_use]
    pub fn activations(&self) -> usize {
        self.recorder
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Activate))
            .count()
    }

    /// Units registered so far, in order.
    #[must_use]
    pub fn units(&self) -> Vec<&str> {
        self.recorder
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::RegisterUnit(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Parameter object accumulated from every merge.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }
}

impl ConfigTarget for RecordingProvisioner {
    fn capability(&self, field: &str) -> FieldCapability {
        self.recorder.capability(field)
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), TargetError> {
        self.recorder.set_field(field, value)
    }

    fn apply_directive(&mut self, field: &str, args: &[Value]) -> Result<(), TargetError> {
        self.recorder.apply_directive(field, args)
    }
}

impl ProvisionerTarget for RecordingProvisioner {
    fn activate(&mut self) {
        self.recorder.calls.push(Call::Activate);
    }

    fn merge_params(&mut self, params: Params) {
        self.recorder.calls.push(Call::MergeParams(params.clone()));
        for (key, value) in params {
            self.params.insert(key, value);
        }
    }

    fn register_unit(&mut self, name: &str) {
        self.recorder.calls.push(Call::RegisterUnit(name.to_owned()));
    }
}

/// Primary target double recording setter and directive calls.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    recorder: Recorder,
    provisioner: RecordingProvisioner,
}

impl RecordingTarget {
    /// Target without dedicated setters; every field becomes a directive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target exposing dedicated setters for `fields`.
    #[must_use]
    pub fn with_setters<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut target = Self::default();
        target.recorder.setters = fields.into_iter().map(Into::into).collect();
        target
    }

    /// Gives the provisioner dedicated setters for `fields`.
    #[must_use]
    pub fn with_provisioner_setters<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provisioner.recorder.setters = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Makes the target reject every value for `field`.
    #[must_use]
    pub fn rejecting(mut self, field: &str) -> Self {
        self.recorder.rejected.insert(field.to_owned());
        self
    }

    /// Calls observed on the primary target, in order.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.recorder.calls
    }

    /// The provisioner double.
    #[must_use]
    pub const fn recorded_provisioner(&self) -> &RecordingProvisioner {
        &self.provisioner
    }
}

impl ConfigTarget for RecordingTarget {
    fn capability(&self, field: &str) -> FieldCapability {
        self.recorder.capability(field)
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), TargetError> {
        self.recorder.set_field(field, value)
    }

    fn apply_directive(&mut self, field: &str, args: &[Value]) -> Result<(), TargetError> {
        self.recorder.apply_directive(field, args)
    }
}

impl PrimaryTarget for RecordingTarget {
    fn provisioner(&mut self) -> &mut dyn ProvisionerTarget {
        &mut self.provisioner
    }
}
