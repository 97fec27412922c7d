//! Wire types for the reference license server protocol.
//!
//! Every request body is JSON signed with the client key; the signature
//! travels in [`CLIENT_SIGNATURE_HEADER`]. Authentication responses are
//! signed by the server over the exact body bytes and must echo the
//! request nonce.

use crate::device::DeviceInfo;
use keylease_types::{LeaseError, LeaseResult, Status};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Header carrying the client's signature over the request body.
pub const CLIENT_SIGNATURE_HEADER: &str = "x-keylease-signature";

/// Header carrying the server's signature over the response body.
pub const SERVER_SIGNATURE_HEADER: &str = "x-keylease-server-signature";

/// Opens a session.
pub const AUTHENTICATE_PATH: &str = "/sessions";

/// Extends a session.
pub const KEEPALIVE_PATH: &str = "/sessions/keepalive";

/// Invalidates a session.
pub const RELEASE_PATH: &str = "/sessions/release";

/// Maximum length for response bodies quoted in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Body of an authentication request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Client identity from the secret file.
    pub client_id: String,
    /// Fresh random value the server must echo.
    pub nonce: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Host description.
    pub device: DeviceInfo,
    /// Per-client device fingerprint.
    pub fingerprint: String,
}

/// Body of a successful authentication response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque session token.
    pub token: String,
    /// Echo of [`AuthRequest::nonce`].
    pub nonce: String,
    /// Optional license-server payload for the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_content: Option<String>,
    /// Recommended keepalive cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keepalive_interval_secs: Option<u64>,
}

/// Body of keepalive and release requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Client identity from the secret file.
    pub client_id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Decodes a response body, separating "not JSON" from "wrong shape".
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> LeaseResult<T> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        LeaseError::new(
            Status::JsonParse,
            format!("response is not JSON ({e}): {}", truncate_body(body)),
        )
    })?;
    serde_json::from_value(value).map_err(|e| {
        LeaseError::new(
            Status::JsonStructure,
            format!("unexpected response shape: {e}"),
        )
    })
}

/// Quotes a response body for an error message, capped at 500 bytes.
#[must_use]
pub fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY_LENGTH {
        return text.into_owned();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &text[..end], body.len())
}
