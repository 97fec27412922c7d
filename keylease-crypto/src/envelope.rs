//! The on-disk envelope of an encrypted secret file.
//!
//! ```json
//! {
//!   "version": 1,
//!   "kdf": { "salt": "<base64>", "memory_cost": 19456, "time_cost": 2, "parallelism": 1 },
//!   "payload": "<base64 nonce || ciphertext>"
//! }
//! ```
//!
//! The payload is the plaintext secret document, encrypted with a key
//! derived from the password and the stored KDF parameters.

use crate::cipher::{self, EncryptedData};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KdfParams, Salt};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// KDF salt and cost parameters as stored in the envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfDescriptor {
    /// Base64 salt.
    pub salt: String,
    /// Cost parameters.
    #[serde(flatten)]
    pub params: KdfParams,
}

/// A password-sealed secret document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSecret {
    /// Envelope format version.
    pub version: u8,
    /// How to re-derive the key.
    pub kdf: KdfDescriptor,
    /// Base64 `nonce || ciphertext`.
    pub payload: String,
}

impl SealedSecret {
    /// Current envelope format version.
    pub const CURRENT_VERSION: u8 = 1;

    /// Encrypts `plaintext` under a key derived from `password`.
    pub fn seal(plaintext: &[u8], password: &str, params: &KdfParams) -> CryptoResult<Self> {
        let salt = Salt::random();
        let key = derive_key(password, &salt, params)?;
        let encrypted = cipher::encrypt(&key, plaintext)?;

        Ok(Self {
            version: Self::CURRENT_VERSION,
            kdf: KdfDescriptor {
                salt: STANDARD.encode(salt.as_bytes()),
                params: params.clone(),
            },
            payload: encrypted.to_base64(),
        })
    }

    /// Decrypts the payload with `password`.
    ///
    /// A wrong password surfaces as [`CryptoError::Decryption`]; every other
    /// error means the envelope itself is unusable.
    pub fn open(&self, password: &str) -> CryptoResult<Vec<u8>> {
        if self.version != Self::CURRENT_VERSION {
            return Err(CryptoError::UnsupportedVersion(self.version));
        }

        let salt_bytes = STANDARD
            .decode(self.kdf.salt.trim())
            .map_err(|e| CryptoError::Envelope(format!("invalid salt base64: {e}")))?;
        let salt = Salt::from_slice(&salt_bytes)?;
        if let Some(violation) = self.kdf.params.limit_violation() {
            return Err(CryptoError::Envelope(violation));
        }
        let encrypted = EncryptedData::from_base64(&self.payload)?;

        let key = derive_key(password, &salt, &self.kdf.params)?;
        cipher::decrypt(&key, &encrypted)
    }

    /// Returns true when a JSON value has the shape of an envelope.
    ///
    /// Only the presence of `kdf` and `payload` is checked; a value that
    /// passes may still fail to deserialize.
    pub fn is_envelope(value: &serde_json::Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| obj.contains_key("kdf") && obj.contains_key("payload"))
    }

    /// Parses an envelope from a JSON value.
    pub fn from_value(value: serde_json::Value) -> CryptoResult<Self> {
        serde_json::from_value(value).map_err(|e| CryptoError::Envelope(e.to_string()))
    }

    /// Serializes the envelope as pretty JSON.
    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
