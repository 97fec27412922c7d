//! Shared test helpers for engine tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use keylease_crypto::KdfParams;
use keylease_engine::protocol::{AuthRequest, AuthResponse, CLIENT_SIGNATURE_HEADER, SERVER_SIGNATURE_HEADER};
use keylease_engine::SecretDocument;
use std::path::PathBuf;
use wiremock::{Request, Respond, ResponseTemplate};

pub const CLIENT_ID: &str = "abc-123";

/// Deterministic client key (fixed seed).
pub fn client_key() -> SigningKey {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    SigningKey::from_bytes(&seed)
}

/// Deterministic server key, distinct from the client key.
pub fn server_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

/// Fast KDF params for testing (low memory/iterations for speed)
pub fn fast_kdf_params() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn secret_document(server_url: &str) -> SecretDocument {
    SecretDocument {
        client_id: CLIENT_ID.to_string(),
        server_url: server_url.to_string(),
        client_key: STANDARD.encode(client_key().to_bytes()),
        server_key: STANDARD.encode(server_key().verifying_key().to_bytes()),
    }
}

pub fn write_plain(dir: &tempfile::TempDir, server_url: &str) -> PathBuf {
    let path = dir.path().join("client.json");
    secret_document(server_url).write_plain(&path).unwrap();
    path
}

pub fn write_sealed(dir: &tempfile::TempDir, server_url: &str, password: &str) -> PathBuf {
    let path = dir.path().join("client.enc.json");
    secret_document(server_url)
        .seal_to(&path, password, &fast_kdf_params())
        .unwrap();
    path
}

pub fn write_raw(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Returns true if the request carries a valid client signature.
pub fn client_signature_valid(request: &Request) -> bool {
    let Some(sig) = request.headers.get(CLIENT_SIGNATURE_HEADER) else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(sig.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&bytes) else {
        return false;
    };
    client_key()
        .verifying_key()
        .verify(&request.body, &signature)
        .is_ok()
}

/// How the fake license server misbehaves, if at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    None,
    WrongNonce,
    BadSignature,
    NoSignature,
    NotJson,
    WrongShape,
    EmptyToken,
}

/// Answers authentication requests the way a real license server would.
#[derive(Clone)]
pub struct AuthResponder {
    pub token: String,
    pub custom_content: Option<String>,
    pub keepalive_interval_secs: Option<u64>,
    pub fault: Fault,
}

impl AuthResponder {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            custom_content: None,
            keepalive_interval_secs: None,
            fault: Fault::None,
        }
    }

    pub fn with_custom_content(mut self, content: &str) -> Self {
        self.custom_content = Some(content.to_string());
        self
    }

    pub fn with_keepalive(mut self, secs: u64) -> Self {
        self.keepalive_interval_secs = Some(secs);
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }
}

impl Respond for AuthResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if !client_signature_valid(request) {
            return ResponseTemplate::new(401);
        }
        let Ok(auth) = serde_json::from_slice::<AuthRequest>(&request.body) else {
            return ResponseTemplate::new(400);
        };

        let response = AuthResponse {
            token: if self.fault == Fault::EmptyToken {
                String::new()
            } else {
                self.token.clone()
            },
            nonce: if self.fault == Fault::WrongNonce {
                "replayed-nonce".to_string()
            } else {
                auth.nonce
            },
            custom_content: self.custom_content.clone(),
            keepalive_interval_secs: self.keepalive_interval_secs,
        };
        let body = match self.fault {
            Fault::NotJson => b"<html>maintenance</html>".to_vec(),
            Fault::WrongShape => br#"{"session":"abc"}"#.to_vec(),
            _ => serde_json::to_vec(&response).unwrap(),
        };

        let signature = match self.fault {
            Fault::BadSignature => URL_SAFE_NO_PAD.encode(server_key().sign(b"something else").to_bytes()),
            _ => URL_SAFE_NO_PAD.encode(server_key().sign(&body).to_bytes()),
        };

        let template = ResponseTemplate::new(200).set_body_bytes(body);
        if self.fault == Fault::NoSignature {
            template
        } else {
            template.insert_header(SERVER_SIGNATURE_HEADER, signature.as_str())
        }
    }
}

/// Runs blocking engine calls off the async test runtime.
pub async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}
