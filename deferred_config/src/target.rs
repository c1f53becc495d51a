//! Interfaces implemented by the objects a commit is applied to.
//!
//! A target states, per field, whether it owns a dedicated single-value
//! setter or only accepts the generic named directive. The commit asks once
//! per field and then forwards every value through the matching entry point.

use serde_json::{Map, Value};

use crate::{ConfigError, ConfigResult};

/// Parameter object attached to an extension unit or a shared folder.
pub type Params = Map<String, Value>;

/// Error returned by a target that rejects a value.
pub type TargetError = Box<dyn std::error::Error + Send + Sync>;

/// How a target accepts values for a given field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldCapability {
    /// The target exposes a dedicated setter taking one value.
    Setter,
    /// The target only accepts the generic `(name, args...)` directive.
    Directive,
}

/// Object receiving field values during a commit.
pub trait ConfigTarget {
    /// Reports how values for `field` should be delivered.
    fn capability(&self, field: &str) -> FieldCapability;

    /// Invokes the dedicated setter for `field` with a single value.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetError`] when the target rejects the value.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), TargetError>;

    /// Applies the generic directive `field` with positional arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`TargetError`] when the target rejects the directive.
    fn apply_directive(&mut self, field: &str, args: &[Value]) -> Result<(), TargetError>;
}

/// Secondary target receiving extension fields and units.
pub trait ProvisionerTarget: ConfigTarget {
    /// Enables the provisioning subsystem on the host.
    fn activate(&mut self);

    /// Merges `params` into the provisioner's accumulated parameter object.
    fn merge_params(&mut self, params: Params);

    /// Registers `name` as an active unit.
    fn register_unit(&mut self, name: &str);
}

/// Primary configuration object the commit is applied to.
pub trait PrimaryTarget: ConfigTarget {
    /// Returns the provisioning subsystem attached to this target.
    fn provisioner(&mut self) -> &mut dyn ProvisionerTarget;
}

/// Splits a stored value into the positional arguments of a directive.
///
/// Arrays contribute one argument per element; any other value is passed as
/// a single argument.
///
/// # Examples
///
/// ```
/// use deferred_config::positional_args;
/// use serde_json::json;
///
/// assert_eq!(positional_args(&json!(["web", 80, 8080])).len(), 3);
/// assert_eq!(positional_args(&json!("precise64")), vec![json!("precise64")]);
/// ```
#[must_use]
pub fn positional_args(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Counters accumulated while dispatching values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DispatchCounts {
    pub(crate) setter_calls: usize,
    pub(crate) directive_calls: usize,
}

/// Forwards every value of `field` to `target` according to its capability.
pub(crate) fn dispatch<T>(
    target: &mut T,
    field: &str,
    values: &[Value],
    counts: &mut DispatchCounts,
) -> ConfigResult<()>
where
    T: ConfigTarget + ?Sized,
{
    let capability = target.capability(field);
    for value in values {
        let outcome = match capability {
            FieldCapability::Setter => {
                counts.setter_calls += 1;
                target.set_field(field, value.clone())
            }
            FieldCapability::Directive => {
                counts.directive_calls += 1;
                target.apply_directive(field, &positional_args(value))
            }
        };
        outcome.map_err(|source| ConfigError::dispatch(field, source))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Default)]
    struct Probe {
        setters: Vec<&'static str>,
        calls: Vec<(String, Vec<Value>)>,
        reject: Option<&'static str>,
    }

    impl ConfigTarget for Probe {
        fn capability(&self, field: &str) -> FieldCapability {
            if self.setters.iter().any(|setter| *setter == field) {
                FieldCapability::Setter
            } else {
                FieldCapability::Directive
            }
        }

        fn set_field(&mut self, field: &str, value: Value) -> Result<(), TargetError> {
            self.calls.push((format!("set:{field}"), vec![value]));
            Ok(())
        }

        fn apply_directive(&mut self, field: &str, args: &[Value]) -> Result<(), TargetError> {
            if self.reject == Some(field) {
                return Err(format!("{field} rejected").into());
            }
            self.calls.push((format!("directive:{field}"), args.to_vec()));
            Ok(())
        }
    }

    #[rstest]
    #[case(json!(["web", 80, 8080]), 3)]
    #[case(json!([]), 0)]
    #[case(json!("img"), 1)]
    #[case(json!({"nfs": true}), 1)]
    fn splits_values_into_positional_args(#[case] value: Value, #[case] expected: usize) {
        assert_eq!(positional_args(&value).len(), expected);
    }

    #[test]
    fn setter_receives_each_value_in_order() {
        let mut target = Probe {
            setters: vec!["box"],
            ..Probe::default()
        };
        let mut counts = DispatchCounts::default();
        dispatch(&mut target, "box", &[json!("a"), json!("b")], &mut counts)
            .expect("dispatch succeeds");
        assert_eq!(
            target.calls,
            vec![
                ("set:box".to_owned(), vec![json!("a")]),
                ("set:box".to_owned(), vec![json!("b")]),
            ]
        );
        assert_eq!(counts.setter_calls, 2);
    }

    #[test]
    fn directive_receives_tuple_components() {
        let mut target = Probe::default();
        let mut counts = DispatchCounts::default();
        dispatch(
            &mut target,
            "forward_port",
            &[json!(["web", 80, 8080])],
            &mut counts,
        )
        .expect("dispatch succeeds");
        assert_eq!(
            target.calls,
            vec![(
                "directive:forward_port".to_owned(),
                vec![json!("web"), json!(80), json!(8080)]
            )]
        );
        assert_eq!(counts.directive_calls, 1);
    }

    #[test]
    fn rejection_surfaces_as_dispatch_error() {
        let mut target = Probe {
            reject: Some("network"),
            ..Probe::default()
        };
        let mut counts = DispatchCounts::default();
        let err = dispatch(
            &mut target,
            "network",
            &[json!("33.33.33.10")],
            &mut counts,
        )
        .expect_err("target rejects the value");
        assert!(matches!(err, ConfigError::Dispatch { ref field, .. } if field == "network"));
        assert!(target.calls.is_empty());
    }
}
