//! Secret file decoding.
//!
//! A plaintext secret file is a JSON document:
//!
//! ```json
//! {
//!   "client_id": "abc-123",
//!   "server_url": "https://license.example.com",
//!   "client_key": "<base64 Ed25519 seed>",
//!   "server_key": "<base64 Ed25519 public key>"
//! }
//! ```
//!
//! An encrypted secret file is a [`SealedSecret`] envelope whose payload is
//! that document. Encryption is detected from the content, never from the
//! file name.

use crate::keys::KeyMaterial;
use keylease_crypto::{CryptoError, KdfParams, SealedSecret};
use keylease_types::{LeaseError, LeaseResult, Status};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// File-name suffix conventionally used for encrypted secret files.
///
/// Informational only: detection looks at the content.
pub const ENCRYPTED_SUFFIX: &str = ".enc.json";

/// The plaintext secret document.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretDocument {
    /// Stable identity of this license client.
    pub client_id: String,
    /// Base URL of the license server.
    pub server_url: String,
    /// Base64 Ed25519 seed used to sign requests.
    pub client_key: String,
    /// Base64 Ed25519 public key of the server.
    pub server_key: String,
}

impl SecretDocument {
    /// Writes the document as plaintext JSON.
    pub fn write_plain(&self, path: &Path) -> LeaseResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LeaseError::new(Status::Generic, format!("cannot encode secret: {e}")))?;
        write_file(path, json.as_bytes())
    }

    /// Seals the document under `password` and writes the envelope.
    pub fn seal_to(&self, path: &Path, password: &str, params: &KdfParams) -> LeaseResult<()> {
        let plaintext = serde_json::to_vec(self)
            .map_err(|e| LeaseError::new(Status::Generic, format!("cannot encode secret: {e}")))?;
        let json = SealedSecret::seal(&plaintext, password, params)
            .and_then(|sealed| sealed.to_json())
            .map_err(|e| LeaseError::new(Status::Generic, format!("cannot seal secret: {e}")))?;
        write_file(path, json.as_bytes())
    }
}

impl std::fmt::Debug for SecretDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretDocument")
            .field("client_id", &self.client_id)
            .field("server_url", &self.server_url)
            .field("client_key", &"[REDACTED]")
            .field("server_key", &self.server_key)
            .finish()
    }
}

/// A decoded and validated secret.
#[derive(Debug)]
pub struct SecretMaterial {
    /// Stable identity of this license client.
    pub client_id: String,
    /// Base URL of the license server, as written in the file.
    pub server_url: String,
    /// Signing and verification keys.
    pub keys: KeyMaterial,
    /// Whether the file was a password envelope.
    pub encrypted: bool,
}

impl SecretMaterial {
    /// Reads and decodes a secret file.
    ///
    /// # Errors
    ///
    /// - [`Status::FileNotFound`] if the file cannot be read
    /// - [`Status::JsonParse`] if the file (or decrypted payload) is not JSON
    /// - [`Status::BadPassword`] if the file is encrypted and the password is
    ///   missing or wrong
    /// - [`Status::InvalidSecretFile`] for a malformed envelope or empty/invalid fields
    /// - [`Status::JsonStructure`] if required fields are missing or mistyped
    /// - [`Status::KeyParse`] if a key cannot be decoded
    pub fn load(path: &Path, password: Option<&str>) -> LeaseResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            LeaseError::new(
                Status::FileNotFound,
                format!("cannot open secret file {}: {e}", path.display()),
            )
        })?;
        Self::from_bytes(&bytes, password)
    }

    /// Decodes secret-file content already in memory.
    pub fn from_bytes(bytes: &[u8], password: Option<&str>) -> LeaseResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
            LeaseError::new(Status::JsonParse, format!("secret file is not JSON: {e}"))
        })?;

        let (document, encrypted) = if SealedSecret::is_envelope(&value) {
            let password = password.ok_or_else(|| {
                LeaseError::new(
                    Status::BadPassword,
                    "secret file is encrypted and no password was supplied",
                )
            })?;
            let sealed = SealedSecret::from_value(value).map_err(crypto_error)?;
            let plaintext = sealed.open(password).map_err(crypto_error)?;
            let inner = serde_json::from_slice(&plaintext).map_err(|e| {
                LeaseError::new(Status::JsonParse, format!("decrypted secret is not JSON: {e}"))
            })?;
            (inner, true)
        } else {
            if password.is_some() {
                debug!("password supplied for a plaintext secret file; ignoring it");
            }
            (value, false)
        };

        let document: SecretDocument = serde_json::from_value(document).map_err(|e| {
            LeaseError::new(Status::JsonStructure, format!("secret document: {e}"))
        })?;
        Self::from_document(document, encrypted)
    }

    fn from_document(document: SecretDocument, encrypted: bool) -> LeaseResult<Self> {
        let client_id = document.client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(LeaseError::new(
                Status::InvalidSecretFile,
                "client_id is empty",
            ));
        }

        let server_url = document.server_url.trim().to_string();
        let parsed = Url::parse(&server_url).map_err(|e| {
            LeaseError::new(
                Status::InvalidSecretFile,
                format!("server_url {server_url:?} is not a valid URL: {e}"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(LeaseError::new(
                Status::InvalidSecretFile,
                format!("server_url {server_url:?} must be an http(s) URL"),
            ));
        }

        let keys = KeyMaterial::from_encoded(&document.client_key, &document.server_key)?;

        Ok(Self {
            client_id,
            server_url,
            keys,
            encrypted,
        })
    }
}

/// Maps envelope failures onto the taxonomy.
///
/// Only an authentication-tag mismatch means "wrong password"; anything else
/// means the envelope is unusable.
fn crypto_error(err: CryptoError) -> LeaseError {
    match err {
        CryptoError::Decryption(_) => LeaseError::new(
            Status::BadPassword,
            "cannot decrypt secret file: wrong password",
        ),
        other => LeaseError::new(
            Status::InvalidSecretFile,
            format!("encrypted secret file is malformed: {other}"),
        ),
    }
}

fn write_file(path: &Path, contents: &[u8]) -> LeaseResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        LeaseError::new(
            Status::Generic,
            format!("cannot write secret file {}: {e}", path.display()),
        )
    })
}
