//! Ed25519 key material carried in a secret file.
//!
//! A secret file holds two keys:
//! - `client_key`: the client's 32-byte Ed25519 seed, used to sign every request
//! - `server_key`: the license server's 32-byte Ed25519 public key, used to
//!   verify authentication responses
//!
//! Both are base64; standard and URL-safe alphabets are accepted, with or
//! without padding. Signatures on the wire are unpadded base64url.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keylease_types::{LeaseError, LeaseResult, Status};

/// Length of both encoded keys once decoded.
pub const KEY_LEN: usize = 32;

/// The signing and verification keys bound to one client.
pub struct KeyMaterial {
    signing: SigningKey,
    server: VerifyingKey,
}

impl KeyMaterial {
    /// Decodes the two base64 keys from a secret file.
    ///
    /// # Errors
    ///
    /// Returns [`Status::KeyParse`] if either key is not base64, has the wrong
    /// length, or (for the server key) is not a valid curve point.
    pub fn from_encoded(client_key: &str, server_key: &str) -> LeaseResult<Self> {
        let seed = decode_key("client_key", client_key)?;
        let server_bytes = decode_key("server_key", server_key)?;

        let server = VerifyingKey::from_bytes(&server_bytes).map_err(|_| {
            LeaseError::new(Status::KeyParse, "server_key is not a valid Ed25519 public key")
        })?;

        Ok(Self {
            signing: SigningKey::from_bytes(&seed),
            server,
        })
    }

    /// Builds key material from already-decoded keys.
    #[must_use]
    pub fn from_parts(signing: SigningKey, server: VerifyingKey) -> Self {
        Self { signing, server }
    }

    /// Returns the client's public key as unpadded base64url.
    #[must_use]
    pub fn client_public_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.signing.verifying_key().to_bytes())
    }

    /// Signs `message` and returns the unpadded base64url signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(self.signing.sign(message).to_bytes())
    }

    /// Verifies a server signature over the exact response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Status::SignatureVerification`] if the signature is malformed
    /// or does not verify.
    pub fn verify_server(&self, message: &[u8], signature_b64: &str) -> LeaseResult<()> {
        let sig_bytes = URL_SAFE_NO_PAD
            .decode(signature_b64.trim().trim_end_matches('='))
            .map_err(|e| {
                LeaseError::new(
                    Status::SignatureVerification,
                    format!("invalid server signature base64: {e}"),
                )
            })?;

        let signature = Signature::from_slice(&sig_bytes).map_err(|_| {
            LeaseError::new(Status::SignatureVerification, "invalid server signature length")
        })?;

        self.server.verify(message, &signature).map_err(|_| {
            LeaseError::new(
                Status::SignatureVerification,
                "server signature does not match response",
            )
        })
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("client_public_key", &self.client_public_key())
            .field("signing", &"[REDACTED]")
            .finish()
    }
}

fn decode_key(field: &str, encoded: &str) -> LeaseResult<[u8; KEY_LEN]> {
    let encoded = encoded.trim();
    let bytes = [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD]
        .into_iter()
        .find_map(|engine| engine.decode(encoded).ok())
        .ok_or_else(|| LeaseError::new(Status::KeyParse, format!("{field} is not valid base64")))?;

    bytes.as_slice().try_into().map_err(|_| {
        LeaseError::new(
            Status::KeyParse,
            format!("{field} must be {KEY_LEN} bytes, got {}", bytes.len()),
        )
    })
}
