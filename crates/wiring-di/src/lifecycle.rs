//! Service lifecycle semantics

use std::fmt;

use serde::{Deserialize, Serialize};

/// Policy governing when a resolved instance is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Created every time it is resolved
    Transient,

    /// Created once and shared for the lifetime of the container
    Singleton,

    /// Created once per scope and shared within that scope
    Scoped,
}

impl Lifecycle {
    /// Returns `true` if resolved instances are cached somewhere
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifecycle::Singleton | Lifecycle::Scoped)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Transient => write!(f, "Transient"),
            Lifecycle::Singleton => write!(f, "Singleton"),
            Lifecycle::Scoped => write!(f, "Scoped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cached() {
        assert!(Lifecycle::Singleton.is_cached());
        assert!(Lifecycle::Scoped.is_cached());
        assert!(!Lifecycle::Transient.is_cached());
    }

    #[test]
    fn test_display() {
        assert_eq!(Lifecycle::Transient.to_string(), "Transient");
        assert_eq!(Lifecycle::Singleton.to_string(), "Singleton");
        assert_eq!(Lifecycle::Scoped.to_string(), "Scoped");
    }
}
