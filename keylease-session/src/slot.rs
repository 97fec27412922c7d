//! Exactly-once ownership of an engine resource.

use keylease_engine::LicenseEngine;
use std::sync::Arc;
use tracing::debug;

/// Holds the engine resource behind a credential handle.
///
/// The resource is freed through [`ResourceSlot::free`], which empties the
/// slot before handing the resource back to the engine. Explicit release
/// and `Drop` both go through it, so whichever runs first frees the
/// resource and the other finds the slot empty.
pub struct ResourceSlot<E: LicenseEngine> {
    engine: Arc<E>,
    resource: Option<E::Resource>,
}

impl<E: LicenseEngine> ResourceSlot<E> {
    /// Takes ownership of a freshly parsed resource.
    #[must_use]
    pub fn new(engine: Arc<E>, resource: E::Resource) -> Self {
        Self {
            engine,
            resource: Some(resource),
        }
    }

    /// Returns the resource, or `None` once it has been freed.
    pub fn get_mut(&mut self) -> Option<&mut E::Resource> {
        self.resource.as_mut()
    }

    /// Returns true once the resource has been handed back to the engine.
    #[must_use]
    pub fn is_freed(&self) -> bool {
        self.resource.is_none()
    }

    /// Runs `f` against the engine and the live resource.
    pub(crate) fn with_resource<T>(
        &mut self,
        f: impl FnOnce(&E, &mut E::Resource) -> T,
    ) -> Option<T> {
        let resource = self.resource.as_mut()?;
        Some(f(&self.engine, resource))
    }

    /// Frees the resource. Returns false if it was already freed.
    pub fn free(&mut self) -> bool {
        match self.resource.take() {
            Some(resource) => {
                self.engine.free(resource);
                true
            }
            None => false,
        }
    }
}

impl<E: LicenseEngine> Drop for ResourceSlot<E> {
    fn drop(&mut self) {
        if self.free() {
            debug!("reclaimed engine resource on drop");
        }
    }
}

impl<E: LicenseEngine> std::fmt::Debug for ResourceSlot<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSlot")
            .field("freed", &self.is_freed())
            .finish()
    }
}
