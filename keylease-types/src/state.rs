//! Lifecycle states of a credential handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a credential handle is in its lifecycle.
///
/// A failed operation never moves a handle, so there is no stored
/// "failed" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Secret file decoded, no session yet.
    Parsed,
    /// Holding a session token.
    Authenticated,
    /// Terminal: session invalidated and resource freed.
    Released,
}

impl LifecycleState {
    /// Returns true while the handle still owns its engine resource.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Released)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsed => "parsed",
            Self::Authenticated => "authenticated",
            Self::Released => "released",
        };
        f.write_str(name)
    }
}
