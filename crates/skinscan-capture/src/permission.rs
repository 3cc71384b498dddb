//! Permission gating for device capabilities.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A device capability gating an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
}

impl Capability {
    /// Identifier keyed into the platform permission subsystem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fronts the platform permission subsystem.
///
/// `request` may trigger an OS-level prompt; it resolves once the user
/// (or platform policy) answers. No retry logic lives here: a denial
/// is terminal for the current attempt and is surfaced by the session
/// controller as a permission failure.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Whether the capability is already authorized.
    fn check_granted(&self, capability: Capability) -> bool;

    /// Request authorization, resolving to `true` when granted.
    async fn request(&self, capability: Capability) -> bool;
}
