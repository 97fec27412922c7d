//! Password key derivation.
//!
//! Uses Argon2id to turn a secret-file password into a cipher key.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of cipher keys in bytes (256 bits for ChaCha20).
pub const KEY_SIZE: usize = 32;

/// Size of salt in bytes.
pub const SALT_SIZE: usize = 16;

/// A 256-bit cipher key. Zeroized on drop; `Debug` never prints it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Per-envelope Argon2 salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a salt from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SALT_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::Envelope(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Argon2id cost parameters.
///
/// Stored alongside every sealed secret so files sealed with older
/// parameters stay readable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Largest accepted memory cost: 1 GiB.
    pub const MAX_MEMORY_COST: u32 = 1024 * 1024;
    /// Largest accepted iteration count.
    pub const MAX_TIME_COST: u32 = 16;
    /// Largest accepted parallelism factor.
    pub const MAX_PARALLELISM: u32 = 16;

    /// Names the first cost that exceeds its upper bound, if any.
    ///
    /// Costs come from the secret file, so they are bounded before any
    /// memory is allocated for the hash.
    pub fn limit_violation(&self) -> Option<String> {
        let checks = [
            ("memory_cost", self.memory_cost, Self::MAX_MEMORY_COST),
            ("time_cost", self.time_cost, Self::MAX_TIME_COST),
            ("parallelism", self.parallelism, Self::MAX_PARALLELISM),
        ];
        checks
            .into_iter()
            .find(|(_, value, max)| value > max)
            .map(|(name, value, max)| format!("{name} {value} exceeds the limit of {max}"))
    }

    /// Builds the Argon2id hasher, rejecting out-of-range costs.
    fn hasher(&self) -> CryptoResult<Argon2<'static>> {
        if let Some(violation) = self.limit_violation() {
            return Err(CryptoError::KeyDerivation(violation));
        }
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Derives a cipher key from a password using Argon2id.
pub fn derive_key(password: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<DerivedKey> {
    let mut key = DerivedKey::from_bytes([0u8; KEY_SIZE]);
    params
        .hasher()?
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut key.bytes)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}
