//! Error types for registration, resolution and validation

use thiserror::Error;

use crate::validation::ConfigurationError;

/// Boxed error produced by a failing constructor
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for container operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur while registering or resolving services
#[derive(Debug, Error)]
pub enum DiError {
    /// A descriptor with the same key is already registered
    #[error("Registration already exists for key: {key}")]
    RegistrationConflict { key: String },

    /// No descriptor matches the requested contract or name
    #[error("Service not registered: {requested}")]
    ResolutionNotFound { requested: String },

    /// The descriptor registered under a name does not provide the requested contract
    #[error("Registration '{key}' does not provide {expected}")]
    ContractMismatch { key: String, expected: &'static str },

    /// A constructor consumed its arguments out of declaration order
    #[error("Constructor of {implementation} expected an argument of type {expected}")]
    ArgumentMismatch {
        implementation: &'static str,
        expected: &'static str,
    },

    /// The implementation constructor returned an error
    #[error("Failed to construct {implementation}: {source}")]
    ConstructionFailure {
        implementation: &'static str,
        #[source]
        source: BoxError,
    },

    /// Construction revisited a type already on the resolution path
    #[error("Circular dependency detected: {path}")]
    CircularDependency { path: String },

    /// The resolution path grew past the configured limit
    #[error("Resolution depth limit of {limit} exceeded while resolving {requested}")]
    DepthLimitExceeded { limit: usize, requested: String },

    /// `build()` found one or more unresolvable registrations
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigurationError),

    /// Container options could not be loaded
    #[error("Invalid container options: {0}")]
    Options(#[from] config::ConfigError),
}

impl DiError {
    pub(crate) fn not_found(requested: impl Into<String>) -> Self {
        Self::ResolutionNotFound {
            requested: requested.into(),
        }
    }

    /// Whether this error means nothing was registered for the request
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResolutionNotFound { .. })
    }

    /// Whether this error was caused by a dependency cycle
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiError::RegistrationConflict {
            key: "RndGuidWriterRandomGuidWriter1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Registration already exists for key: RndGuidWriterRandomGuidWriter1"
        );

        let err = DiError::not_found("Clock");
        assert_eq!(err.to_string(), "Service not registered: Clock");
        assert!(err.is_not_found());

        let err = DiError::CircularDependency {
            path: "A -> B -> A".to_string(),
        };
        assert_eq!(err.to_string(), "Circular dependency detected: A -> B -> A");
        assert!(err.is_circular());

        let err = DiError::ConstructionFailure {
            implementation: "Mailer",
            source: "smtp host missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to construct Mailer: smtp host missing"
        );
    }

    #[test]
    fn test_construction_failure_keeps_source() {
        use std::error::Error as _;

        let err = DiError::ConstructionFailure {
            implementation: "Mailer",
            source: "smtp host missing".into(),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("smtp host missing"));
    }
}
