//! Shared test helpers for session tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::SigningKey;
use keylease_crypto::KdfParams;
use keylease_engine::{Grant, LicenseEngine, ParsedSecret, SecretDocument, SecretMaterial};
use keylease_session::LicenseClient;
use keylease_types::{LeaseError, LeaseResult, Status};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CLIENT_ID: &str = "abc-123";
pub const SERVER_URL: &str = "https://license.example.com";
pub const PASSWORD: &str = "123";

pub fn client_key() -> SigningKey {
    SigningKey::from_bytes(&[3u8; 32])
}

pub fn server_key() -> SigningKey {
    SigningKey::from_bytes(&[9u8; 32])
}

/// Fast KDF params for testing (low memory/iterations for speed)
pub fn fast_kdf_params() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn secret_document(client_id: &str, server_url: &str) -> SecretDocument {
    SecretDocument {
        client_id: client_id.to_string(),
        server_url: server_url.to_string(),
        client_key: STANDARD.encode(client_key().to_bytes()),
        server_key: STANDARD.encode(server_key().verifying_key().to_bytes()),
    }
}

pub fn write_plain(dir: &tempfile::TempDir, name: &str, client_id: &str) -> PathBuf {
    let path = dir.path().join(name);
    secret_document(client_id, SERVER_URL)
        .write_plain(&path)
        .unwrap();
    path
}

pub fn write_sealed(dir: &tempfile::TempDir, server_url: &str) -> PathBuf {
    let path = dir.path().join("client.enc.json");
    secret_document(CLIENT_ID, server_url)
        .seal_to(&path, PASSWORD, &fast_kdf_params())
        .unwrap();
    path
}

// ── MockEngine ───────────────────────────────────────────────────

/// Engine resource of the mock: an id plus the token it holds.
#[derive(Debug)]
pub struct MockResource {
    pub id: u64,
    pub token: Option<String>,
    pub insecure_tls: bool,
}

/// Scripted license engine that records every call.
///
/// Parsing goes through the real secret-file decoder. Network operations
/// succeed unless a failure has been queued for them.
#[derive(Default)]
pub struct MockEngine {
    next_id: AtomicU64,
    pub authenticates: AtomicUsize,
    pub keepalives: AtomicUsize,
    pub releases: AtomicUsize,
    auth_script: Mutex<VecDeque<LeaseResult<Grant>>>,
    keepalive_script: Mutex<VecDeque<LeaseResult<()>>>,
    release_script: Mutex<VecDeque<LeaseResult<()>>>,
    tls_calls: Mutex<Vec<(u64, bool)>>,
    frees: Mutex<HashMap<u64, usize>>,
}

impl MockEngine {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue_auth(&self, result: LeaseResult<Grant>) {
        self.auth_script.lock().unwrap().push_back(result);
    }

    pub fn queue_auth_failure(&self, status: Status) {
        self.queue_auth(Err(LeaseError::from_status(status)));
    }

    pub fn queue_keepalive_failure(&self, status: Status) {
        self.keepalive_script
            .lock()
            .unwrap()
            .push_back(Err(LeaseError::from_status(status)));
    }

    pub fn queue_release_failure(&self, status: Status) {
        self.release_script
            .lock()
            .unwrap()
            .push_back(Err(LeaseError::from_status(status)));
    }

    /// Authenticate + keepalive + release calls that reached the engine.
    pub fn network_calls(&self) -> usize {
        self.authenticates.load(Ordering::SeqCst)
            + self.keepalives.load(Ordering::SeqCst)
            + self.releases.load(Ordering::SeqCst)
    }

    pub fn parsed(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Free count per resource id.
    pub fn frees(&self) -> HashMap<u64, usize> {
        self.frees.lock().unwrap().clone()
    }

    pub fn total_frees(&self) -> usize {
        self.frees.lock().unwrap().values().sum()
    }

    pub fn tls_calls(&self) -> Vec<(u64, bool)> {
        self.tls_calls.lock().unwrap().clone()
    }
}

impl LicenseEngine for MockEngine {
    type Resource = MockResource;

    fn parse(&self, path: &Path, password: Option<&str>) -> LeaseResult<ParsedSecret<MockResource>> {
        let secret = SecretMaterial::load(path, password)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(ParsedSecret {
            resource: MockResource {
                id,
                token: None,
                insecure_tls: false,
            },
            client_id: secret.client_id,
            server_url: secret.server_url,
        })
    }

    fn authenticate(&self, resource: &mut MockResource) -> LeaseResult<Grant> {
        let n = self.authenticates.fetch_add(1, Ordering::SeqCst);
        let scripted = self.auth_script.lock().unwrap().pop_front();
        let grant = scripted.unwrap_or_else(|| {
            Ok(Grant {
                token: format!("tok-{}-{n}", resource.id),
                custom_content: None,
                keepalive_interval: None,
            })
        })?;
        resource.token = Some(grant.token.clone());
        Ok(grant)
    }

    fn keepalive(&self, resource: &mut MockResource) -> LeaseResult<()> {
        self.keepalives.fetch_add(1, Ordering::SeqCst);
        if resource.token.is_none() {
            return Err(LeaseError::from_status(Status::NotAuthenticated));
        }
        self.keepalive_script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    fn release(&self, resource: &mut MockResource) -> LeaseResult<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        resource.token = None;
        self.release_script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    fn set_insecure_tls(&self, resource: &mut MockResource, allow: bool) {
        resource.insecure_tls = allow;
        self.tls_calls.lock().unwrap().push((resource.id, allow));
    }

    fn free(&self, resource: MockResource) {
        *self.frees.lock().unwrap().entry(resource.id).or_default() += 1;
    }
}

/// Client over a fresh mock engine, plus the engine for inspection.
pub fn mock_client() -> (LicenseClient<MockEngine>, Arc<MockEngine>) {
    let engine = MockEngine::shared();
    (LicenseClient::from_shared(Arc::clone(&engine)), engine)
}

pub fn grant(token: &str, custom_content: Option<&str>, keepalive_secs: Option<u64>) -> Grant {
    Grant {
        token: token.to_string(),
        custom_content: custom_content.map(str::to_string),
        keepalive_interval: keepalive_secs.map(Duration::from_secs),
    }
}
