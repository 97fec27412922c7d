//! Reference license engine for keylease.
//!
//! This crate handles everything the session core treats as opaque:
//! - Secret file decoding (plaintext or password envelope)
//! - Ed25519 request signing and response verification
//! - Device fingerprinting for seat accounting
//! - The HTTPS protocol to the license server
//!
//! The session core talks only to the [`LicenseEngine`] trait; [`HttpEngine`]
//! is the implementation used in production.
//!
//! # Protocol
//!
//! - `POST {server}/v1/sessions` opens a session; the response is signed by
//!   the server and echoes the request nonce
//! - `POST {server}/v1/sessions/keepalive` extends it
//! - `POST {server}/v1/sessions/release` invalidates it
//!
//! Non-2xx answers map onto the status taxonomy via [`Status::from_http`].
//!
//! [`Status::from_http`]: keylease_types::Status::from_http

mod config;
mod device;
mod engine;
mod http;
mod keys;
pub mod protocol;
mod secret;

pub use config::{
    EngineConfig, ENV_API_PREFIX, ENV_CONNECT_TIMEOUT, ENV_REQUEST_TIMEOUT, ENV_USER_AGENT,
};
pub use device::{DeviceFingerprint, DeviceInfo};
pub use engine::{Grant, LicenseEngine, ParsedSecret};
pub use http::{HttpEngine, HttpSession};
pub use keys::{KeyMaterial, KEY_LEN};
pub use secret::{SecretDocument, SecretMaterial, ENCRYPTED_SUFFIX};
