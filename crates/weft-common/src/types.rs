//! Domain primitive types used across the weft workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SHORT_ID_LEN;
use crate::error::{Result, WeftError};

/// Full container identifier as reported by the container runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the truncated identifier used to key per-container state.
    ///
    /// # Errors
    ///
    /// Returns an error if the container ID is shorter than the truncated
    /// length, before any resource is touched.
    pub fn short(&self) -> Result<ShortId> {
        self.0
            .get(..SHORT_ID_LEN)
            .map(|prefix| ShortId(prefix.to_string()))
            .ok_or_else(|| WeftError::Config {
                message: format!(
                    "container id `{}` is shorter than {SHORT_ID_LEN} characters",
                    self.0
                ),
            })
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncated container identifier (first 11 characters).
///
/// Keys the OS network namespace, the controller-side workload, and the
/// host-side veth device name. Assumed unique among concurrently live
/// containers on a node; no collision detection is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortId(String);

impl ShortId {
    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the pod a container belongs to.
///
/// The pod namespace maps to the controller-side project; the pod name is
/// carried for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRef {
    /// Kubernetes namespace of the pod, mapped 1:1 to a project.
    pub namespace: String,
    /// Pod name.
    pub name: String,
}

impl PodRef {
    /// Creates a pod reference.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_eleven_chars() {
        let id = ContainerId::new("abcdef0123456789");
        let short = id.short().expect("long enough");
        assert_eq!(short.as_str(), "abcdef01234");
    }

    #[test]
    fn short_id_exact_length_accepted() {
        let id = ContainerId::new("abcdef01234");
        assert_eq!(id.short().expect("exact length").as_str(), "abcdef01234");
    }

    #[test]
    fn short_id_rejects_short_input() {
        let id = ContainerId::new("abc");
        assert!(id.short().is_err());
    }

    #[test]
    fn pod_ref_display() {
        let pod = PodRef::new("team-a", "web");
        assert_eq!(pod.to_string(), "team-a/web");
    }
}
