//! Error types produced while registering and applying directives.

use thiserror::Error;

use crate::target::TargetError;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while registering or applying configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A registration argument failed validation.
    #[error("invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Argument that was rejected.
        argument: String,
        /// Human-readable explanation of the rejection.
        message: String,
    },

    /// A target rejected a value while the commit was being applied.
    #[error("failed to apply field '{field}': {source}")]
    Dispatch {
        /// Field whose value was rejected.
        field: String,
        /// Error reported by the target.
        #[source]
        source: TargetError,
    },

    /// Store settings could not be extracted.
    #[error("failed to load store settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// The process-wide store was created before it could be installed.
    #[error("the global configuration store is already initialised")]
    AlreadyInitialised,
}

impl ConfigError {
    /// Construct an [`ConfigError::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```
    /// use deferred_config::ConfigError;
    ///
    /// let err = ConfigError::invalid_argument("path", "not a directory");
    /// assert_eq!(err.to_string(), "invalid argument 'path': not a directory");
    /// ```
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Construct a [`ConfigError::Dispatch`] for `field`.
    #[must_use]
    pub fn dispatch(field: impl Into<String>, source: TargetError) -> Self {
        Self::Dispatch {
            field: field.into(),
            source,
        }
    }

    /// Construct a [`ConfigError::Settings`] from a [`figment::Error`].
    #[must_use]
    pub fn settings(source: figment::Error) -> Self {
        Self::Settings(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use std::error::Error as _;

    #[test]
    fn dispatch_error_exposes_target_source() {
        let err = ConfigError::dispatch("box", "unknown image".into());
        assert_eq!(err.to_string(), "failed to apply field 'box': unknown image");
        let source = err.source().expect("dispatch error carries a source");
        assert_eq!(source.to_string(), "unknown image");
    }

    #[test]
    fn settings_error_wraps_figment() {
        let err = ConfigError::settings(figment::Error::from("boom"));
        assert!(matches!(err, ConfigError::Settings(_)));
        assert!(err.to_string().contains("boom"));
    }
}
