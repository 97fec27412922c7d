//! A credential handle behind a per-handle lock.

use crate::handle::CredentialHandle;
use keylease_engine::{HttpEngine, LicenseEngine};
use keylease_types::{LeaseResult, LifecycleState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, thread-safe wrapper around one [`CredentialHandle`].
///
/// Every operation takes the lock for its whole duration, network call
/// included, so calls on the same handle never interleave. A poisoned lock
/// is recovered: handle operations never leave it half-updated.
pub struct SharedHandle<E: LicenseEngine = HttpEngine> {
    inner: Arc<Mutex<CredentialHandle<E>>>,
}

impl<E: LicenseEngine> SharedHandle<E> {
    #[must_use]
    pub fn new(handle: CredentialHandle<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(handle)),
        }
    }

    /// Locks the handle for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, CredentialHandle<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn authenticate(&self) -> LeaseResult<()> {
        self.lock().authenticate()
    }

    pub fn keepalive(&self) -> LeaseResult<()> {
        self.lock().keepalive()
    }

    pub fn release(&self) -> LeaseResult<()> {
        self.lock().release()
    }

    pub fn set_insecure_tls(&self, allow: bool) {
        self.lock().set_insecure_tls(allow);
    }

    #[must_use]
    pub fn client_id(&self) -> String {
        self.lock().client_id().to_string()
    }

    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.lock().session_token().map(str::to_owned)
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lock().state()
    }
}

impl<E: LicenseEngine> Clone for SharedHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: LicenseEngine> std::fmt::Debug for SharedHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedHandle").field(&*self.lock()).finish()
    }
}
