//! Error types for the secret-file envelope.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening a secret.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed (usually bad KDF parameters).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong password or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The envelope itself is malformed.
    #[error("malformed envelope: {0}")]
    Envelope(String),

    /// The envelope was written by a newer format.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
