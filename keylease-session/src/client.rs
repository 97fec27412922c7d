//! Entry point: turns secret files into credential handles.

use crate::handle::CredentialHandle;
use keylease_engine::{EngineConfig, HttpEngine, LicenseEngine};
use keylease_types::LeaseResult;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Parses secret files with a license engine.
///
/// Every handle keeps a reference to the engine, so the client can be
/// dropped while handles are still in use.
pub struct LicenseClient<E: LicenseEngine = HttpEngine> {
    engine: Arc<E>,
}

impl LicenseClient<HttpEngine> {
    /// Creates a client backed by the HTTP engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine(HttpEngine::new(config))
    }
}

impl Default for LicenseClient<HttpEngine> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<E: LicenseEngine> LicenseClient<E> {
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Self::from_shared(Arc::new(engine))
    }

    /// Creates a client over an engine that is already shared.
    #[must_use]
    pub fn from_shared(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Decodes a secret file into a handle in the parsed state.
    ///
    /// `password` is needed only for encrypted files; for a plaintext file
    /// it is ignored.
    ///
    /// # Errors
    ///
    /// - [`Status::FileNotFound`] if the file cannot be read
    /// - [`Status::BadPassword`] if the file is encrypted and the password
    ///   is missing or wrong
    /// - [`Status::InvalidSecretFile`], [`Status::JsonParse`],
    ///   [`Status::JsonStructure`] or [`Status::KeyParse`] for bad content
    ///
    /// [`Status::FileNotFound`]: keylease_types::Status::FileNotFound
    /// [`Status::BadPassword`]: keylease_types::Status::BadPassword
    /// [`Status::InvalidSecretFile`]: keylease_types::Status::InvalidSecretFile
    /// [`Status::JsonParse`]: keylease_types::Status::JsonParse
    /// [`Status::JsonStructure`]: keylease_types::Status::JsonStructure
    /// [`Status::KeyParse`]: keylease_types::Status::KeyParse
    pub fn parse_secret_file(
        &self,
        path: impl AsRef<Path>,
        password: Option<&str>,
    ) -> LeaseResult<CredentialHandle<E>> {
        let path = path.as_ref();
        let parsed = self.engine.parse(path, password).map_err(|e| {
            warn!(path = %path.display(), status = %e.status(), "cannot parse secret file");
            e.context("Secret file parse failed")
        })?;
        info!(client_id = %parsed.client_id, server_url = %parsed.server_url, "secret file parsed");
        Ok(CredentialHandle::new(Arc::clone(&self.engine), parsed))
    }
}

impl<E: LicenseEngine> Clone for LicenseClient<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: LicenseEngine> std::fmt::Debug for LicenseClient<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseClient").finish_non_exhaustive()
    }
}
