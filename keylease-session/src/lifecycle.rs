//! Lifecycle transitions of a credential handle.
//!
//! ```text
//!   Parsed ──authenticate──▶ Authenticated ──release──▶ Released
//!     │                        │    ▲                     ▲
//!     │                        └────┘ authenticate        │
//!     │                               keepalive           │
//!     └───────────────────────release─────────────────────┘
//! ```
//!
//! A failed call leaves the handle exactly as it was, except `release`,
//! whose local cleanup always happens.

use crate::handle::CredentialHandle;
use keylease_engine::LicenseEngine;
use keylease_types::{LeaseError, LeaseResult, LifecycleState, Status};
use tracing::{debug, info, warn};

impl<E: LicenseEngine> CredentialHandle<E> {
    /// Opens a session with the license server, or refreshes the current one.
    ///
    /// On success the handle holds a fresh session token, and the custom
    /// content and keepalive interval reflect the latest server answer.
    ///
    /// # Errors
    ///
    /// Returns the engine's status on failure, leaving the handle unchanged.
    /// Fails with [`Status::Generic`] on a released handle.
    pub fn authenticate(&mut self) -> LeaseResult<()> {
        debug!(client_id = %self.client_id, state = %self.state, "authenticating");
        if self.state == LifecycleState::Released {
            return Err(released().context("Authentication failed"));
        }

        let grant = self
            .slot
            .with_resource(|engine, resource| engine.authenticate(resource))
            .unwrap_or_else(|| Err(released()))
            .map_err(|e| {
                warn!(client_id = %self.client_id, status = %e.status(), "authentication failed");
                e.context("Authentication failed")
            })?;

        self.session_token = Some(grant.token);
        self.custom_content = grant.custom_content;
        self.keepalive_interval = grant.keepalive_interval;
        self.state = LifecycleState::Authenticated;
        info!(
            client_id = %self.client_id,
            has_custom_content = self.custom_content.is_some(),
            "authenticated"
        );
        Ok(())
    }

    /// Extends the current session.
    ///
    /// # Errors
    ///
    /// Fails with [`Status::NotAuthenticated`] unless the handle is
    /// authenticated; otherwise returns the engine's status. The token is
    /// kept either way.
    pub fn keepalive(&mut self) -> LeaseResult<()> {
        if self.state != LifecycleState::Authenticated {
            return Err(LeaseError::new(
                Status::NotAuthenticated,
                format!("credential handle is {}", self.state),
            )
            .context("Keepalive failed"));
        }

        self.slot
            .with_resource(|engine, resource| engine.keepalive(resource))
            .unwrap_or_else(|| Err(released()))
            .map_err(|e| {
                warn!(client_id = %self.client_id, status = %e.status(), "keepalive failed");
                e.context("Keepalive failed")
            })?;
        debug!(client_id = %self.client_id, "keepalive sent");
        Ok(())
    }

    /// Ends the session and frees the engine resource.
    ///
    /// The server is contacted only when a token is held. Whatever it
    /// answers, the handle ends up released with no token. Releasing a
    /// released handle does nothing.
    ///
    /// # Errors
    ///
    /// Returns the engine's status if remote invalidation failed.
    pub fn release(&mut self) -> LeaseResult<()> {
        if self.state == LifecycleState::Released {
            debug!(client_id = %self.client_id, "already released");
            return Ok(());
        }

        let remote = if self.session_token.is_some() {
            self.slot
                .with_resource(|engine, resource| engine.release(resource))
                .unwrap_or(Ok(()))
        } else {
            Ok(())
        };

        self.session_token = None;
        self.custom_content = None;
        self.keepalive_interval = None;
        self.state = LifecycleState::Released;
        self.slot.free();

        match remote {
            Ok(()) => {
                info!(client_id = %self.client_id, "released");
                Ok(())
            }
            Err(e) => {
                warn!(
                    client_id = %self.client_id,
                    status = %e.status(),
                    "released locally; server did not confirm"
                );
                Err(e.context("Release failed"))
            }
        }
    }

    /// Allows or forbids invalid TLS certificates for later network calls.
    ///
    /// Only for development servers with self-signed certificates.
    pub fn set_insecure_tls(&mut self, allow: bool) {
        if allow {
            warn!(client_id = %self.client_id, "TLS certificate validation disabled");
        }
        self.insecure_tls = allow;
        self.slot
            .with_resource(|engine, resource| engine.set_insecure_tls(resource, allow));
    }
}

fn released() -> LeaseError {
    LeaseError::new(Status::Generic, "credential handle already released")
}
