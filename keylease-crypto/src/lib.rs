//! Password envelope for keylease secret files.
//!
//! Encrypted secret files are JSON envelopes holding Argon2id parameters and
//! a ChaCha20-Poly1305 ciphertext of the plaintext secret document.
//!
//! # Design Principles
//!
//! - **Parameters travel with the file**: the KDF salt and costs are stored in
//!   the envelope, so opening never depends on local defaults
//! - **One failure for a wrong password**: authentication-tag mismatch is the
//!   only way to learn the password was wrong
//! - **Keys never linger**: derived keys are zeroized on drop

mod cipher;
mod envelope;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use envelope::{KdfDescriptor, SealedSecret};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, DerivedKey, KdfParams, Salt, KEY_SIZE, SALT_SIZE};
