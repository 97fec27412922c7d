//! The credential handle and its read-only accessors.

use crate::shared::SharedHandle;
use crate::slot::ResourceSlot;
use keylease_engine::{HttpEngine, LicenseEngine, ParsedSecret};
use keylease_types::LifecycleState;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// An exclusively owned, parsed (and possibly authenticated) license session.
///
/// Created by [`LicenseClient::parse_secret_file`]. Lifecycle operations
/// take `&mut self`; to drive one handle from several threads, wrap it with
/// [`CredentialHandle::into_shared`].
///
/// Dropping a handle that was never released frees its engine resource but
/// does not contact the server; the server-side session expires on its own.
///
/// [`LicenseClient::parse_secret_file`]: crate::LicenseClient::parse_secret_file
pub struct CredentialHandle<E: LicenseEngine = HttpEngine> {
    pub(crate) slot: ResourceSlot<E>,
    pub(crate) client_id: String,
    pub(crate) server_url: String,
    pub(crate) session_token: Option<String>,
    pub(crate) custom_content: Option<String>,
    pub(crate) keepalive_interval: Option<Duration>,
    pub(crate) insecure_tls: bool,
    pub(crate) state: LifecycleState,
}

impl<E: LicenseEngine> CredentialHandle<E> {
    pub(crate) fn new(engine: Arc<E>, parsed: ParsedSecret<E::Resource>) -> Self {
        Self {
            slot: ResourceSlot::new(engine, parsed.resource),
            client_id: parsed.client_id,
            server_url: parsed.server_url,
            session_token: None,
            custom_content: None,
            keepalive_interval: None,
            insecure_tls: false,
            state: LifecycleState::Parsed,
        }
    }

    /// Stable identity of the license client.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// License server base URL.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Current session token; `None` unless authenticated.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Server-supplied payload from the last authentication, if any.
    #[must_use]
    pub fn custom_content(&self) -> Option<&str> {
        self.custom_content.as_deref()
    }

    /// Server-recommended keepalive cadence. Advisory only.
    #[must_use]
    pub fn keepalive_interval(&self) -> Option<Duration> {
        self.keepalive_interval
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == LifecycleState::Authenticated
    }

    #[must_use]
    pub fn insecure_tls_allowed(&self) -> bool {
        self.insecure_tls
    }

    /// Returns true once the engine resource has been freed.
    #[must_use]
    pub fn is_freed(&self) -> bool {
        self.slot.is_freed()
    }

    /// Moves the handle behind a per-handle lock.
    #[must_use]
    pub fn into_shared(self) -> SharedHandle<E> {
        SharedHandle::new(self)
    }
}

impl<E: LicenseEngine> Drop for CredentialHandle<E> {
    fn drop(&mut self) {
        if self.slot.free() {
            debug!(
                client_id = %self.client_id,
                state = %self.state,
                "credential handle dropped without release"
            );
        }
    }
}

impl<E: LicenseEngine> std::fmt::Debug for CredentialHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHandle")
            .field("client_id", &self.client_id)
            .field("server_url", &self.server_url)
            .field("state", &self.state)
            .field("has_token", &self.session_token.is_some())
            .field("insecure_tls", &self.insecure_tls)
            .field("slot", &self.slot)
            .finish()
    }
}
