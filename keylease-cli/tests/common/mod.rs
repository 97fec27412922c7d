//! Shared test helpers for CLI tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::SigningKey;
use keylease_cli::CheckArgs;
use keylease_engine::{Grant, LicenseEngine, ParsedSecret, SecretDocument};
use keylease_types::{LeaseError, LeaseResult, Status};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn write_plain(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("client.json");
    SecretDocument {
        client_id: "abc-123".to_string(),
        server_url: "https://license.example.com".to_string(),
        client_key: STANDARD.encode(SigningKey::from_bytes(&[5u8; 32]).to_bytes()),
        server_key: STANDARD.encode(SigningKey::from_bytes(&[6u8; 32]).verifying_key().to_bytes()),
    }
    .write_plain(&path)
    .unwrap();
    path
}

pub fn check_args(secret: &Path, keepalives: u32) -> CheckArgs {
    CheckArgs {
        secret: secret.to_path_buf(),
        password: None,
        insecure: false,
        keepalives,
        interval: Some(0),
    }
}

/// Engine that always authenticates and optionally fails keepalives or
/// releases.
#[derive(Default)]
pub struct ScriptedEngine {
    pub fail_keepalive: Option<Status>,
    pub fail_release: Option<Status>,
    pub keepalives: AtomicUsize,
    pub releases: AtomicUsize,
    pub frees: AtomicUsize,
}

impl ScriptedEngine {
    pub fn failing_keepalive(status: Status) -> Self {
        Self {
            fail_keepalive: Some(status),
            ..Self::default()
        }
    }

    pub fn failing_release(mut self, status: Status) -> Self {
        self.fail_release = Some(status);
        self
    }
}

impl LicenseEngine for ScriptedEngine {
    type Resource = ();

    fn parse(&self, _path: &Path, _password: Option<&str>) -> LeaseResult<ParsedSecret<()>> {
        Ok(ParsedSecret {
            resource: (),
            client_id: "abc-123".to_string(),
            server_url: "https://license.example.com".to_string(),
        })
    }

    fn authenticate(&self, _resource: &mut ()) -> LeaseResult<Grant> {
        Ok(Grant {
            token: "tok".to_string(),
            custom_content: Some("plan=pro".to_string()),
            keepalive_interval: None,
        })
    }

    fn keepalive(&self, _resource: &mut ()) -> LeaseResult<()> {
        self.keepalives.fetch_add(1, Ordering::SeqCst);
        match self.fail_keepalive {
            Some(status) => Err(LeaseError::from_status(status)),
            None => Ok(()),
        }
    }

    fn release(&self, _resource: &mut ()) -> LeaseResult<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        match self.fail_release {
            Some(status) => Err(LeaseError::from_status(status)),
            None => Ok(()),
        }
    }

    fn set_insecure_tls(&self, _resource: &mut (), _allow: bool) {}

    fn free(&self, _resource: ()) {
        self.frees.fetch_add(1, Ordering::SeqCst);
    }
}
