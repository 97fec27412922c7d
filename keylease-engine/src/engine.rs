//! The boundary between the session core and a license engine.

use keylease_types::LeaseResult;
use std::path::Path;
use std::time::Duration;

/// What a successful parse hands back to the session core.
#[derive(Debug)]
pub struct ParsedSecret<R> {
    /// Engine-private state: key material and connection context.
    pub resource: R,
    /// Stable client identity.
    pub client_id: String,
    /// License server base URL.
    pub server_url: String,
}

/// What a successful authentication hands back to the session core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Opaque session token.
    pub token: String,
    /// Optional server-supplied payload.
    pub custom_content: Option<String>,
    /// Server-recommended keepalive cadence.
    pub keepalive_interval: Option<Duration>,
}

/// Capabilities the session core needs from a license engine.
///
/// The engine owns cryptography and transport. Every method is blocking.
/// Implementations must map every failure onto the status taxonomy, and
/// must leave a resource untouched when a call fails (except
/// [`LicenseEngine::release`], which may drop its token regardless).
pub trait LicenseEngine: Send + Sync {
    /// Engine-private per-handle state.
    type Resource: Send;

    /// Decodes a secret file into a fresh resource.
    fn parse(&self, path: &Path, password: Option<&str>)
        -> LeaseResult<ParsedSecret<Self::Resource>>;

    /// Opens (or refreshes) a session for the resource.
    fn authenticate(&self, resource: &mut Self::Resource) -> LeaseResult<Grant>;

    /// Extends the resource's current session.
    fn keepalive(&self, resource: &mut Self::Resource) -> LeaseResult<()>;

    /// Invalidates the resource's current session on the server.
    fn release(&self, resource: &mut Self::Resource) -> LeaseResult<()>;

    /// Switches certificate validation for later network calls.
    fn set_insecure_tls(&self, resource: &mut Self::Resource, allow: bool);

    /// Destroys the resource. Called exactly once per parsed resource.
    fn free(&self, resource: Self::Resource);
}
