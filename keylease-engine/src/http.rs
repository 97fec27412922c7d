//! License engine speaking the reference protocol over HTTPS.
//!
//! Uses the blocking reqwest client: every call blocks the calling thread
//! until the server answers or the configured timeout expires.

use crate::config::EngineConfig;
use crate::device::{DeviceFingerprint, DeviceInfo};
use crate::engine::{Grant, LicenseEngine, ParsedSecret};
use crate::protocol::{
    decode_body, truncate_body, AuthRequest, AuthResponse, SessionRequest, AUTHENTICATE_PATH,
    CLIENT_SIGNATURE_HEADER, KEEPALIVE_PATH, RELEASE_PATH, SERVER_SIGNATURE_HEADER,
};
use crate::secret::SecretMaterial;
use chrono::Utc;
use keylease_types::{LeaseError, LeaseResult, Status};
use reqwest::blocking::{Client, Response};
use reqwest::header;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-handle state of the HTTP engine.
pub struct HttpSession {
    secret: SecretMaterial,
    device: DeviceInfo,
    fingerprint: DeviceFingerprint,
    token: Option<String>,
    insecure_tls: bool,
    /// Built lazily; dropped whenever the TLS policy changes.
    client: Option<Client>,
}

impl HttpSession {
    fn new(secret: SecretMaterial) -> Self {
        let fingerprint = DeviceFingerprint::generate_for(&secret.client_id);
        Self {
            secret,
            device: DeviceInfo::collect(),
            fingerprint,
            token: None,
            insecure_tls: false,
            client: None,
        }
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.secret.client_id
    }

    /// Returns true while a session token is held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns the current certificate-validation policy.
    #[must_use]
    pub fn insecure_tls(&self) -> bool {
        self.insecure_tls
    }

    /// Returns true if the secret file was a password envelope.
    #[must_use]
    pub fn was_encrypted(&self) -> bool {
        self.secret.encrypted
    }

    fn client(&mut self, config: &EngineConfig) -> LeaseResult<&Client> {
        let client = match self.client.take() {
            Some(client) => client,
            None => build_client(config, self.insecure_tls)?,
        };
        Ok(self.client.insert(client))
    }
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("client_id", &self.secret.client_id)
            .field("server_url", &self.secret.server_url)
            .field("has_token", &self.token.is_some())
            .field("insecure_tls", &self.insecure_tls)
            .finish()
    }
}

/// The reference license engine.
#[derive(Debug, Clone, Default)]
pub struct HttpEngine {
    config: EngineConfig,
}

impl HttpEngine {
    /// Creates an engine with explicit configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Signs and POSTs `body`, returning the response if it is 2xx.
    fn post<B: Serialize>(
        &self,
        session: &mut HttpSession,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> LeaseResult<Response> {
        let url = self.config.endpoint(&session.secret.server_url, path);
        let payload = serde_json::to_vec(body).map_err(|e| {
            LeaseError::new(Status::Generic, format!("cannot encode request: {e}"))
        })?;
        let signature = session.secret.keys.sign(&payload);

        let client = session.client(&self.config)?;
        let mut request = client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header(CLIENT_SIGNATURE_HEADER, signature)
            .body(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!(%url, "sending license request");
        let response = request.send().map_err(|e| {
            LeaseError::new(Status::NetworkError, format!("request to {url} failed: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().unwrap_or_default();
        let mapped = Status::from_http(status.as_u16());
        warn!(
            %url,
            http_status = status.as_u16(),
            status = %mapped,
            "license server rejected request"
        );
        Err(LeaseError::new(
            mapped,
            format!("server answered {status}: {}", truncate_body(&body)),
        ))
    }

    fn session_request(session: &HttpSession) -> SessionRequest {
        SessionRequest {
            client_id: session.secret.client_id.clone(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

impl LicenseEngine for HttpEngine {
    type Resource = HttpSession;

    fn parse(&self, path: &Path, password: Option<&str>) -> LeaseResult<ParsedSecret<HttpSession>> {
        let secret = SecretMaterial::load(path, password)?;
        debug!(
            client_id = %secret.client_id,
            encrypted = secret.encrypted,
            "decoded secret file"
        );
        let client_id = secret.client_id.clone();
        let server_url = secret.server_url.clone();
        Ok(ParsedSecret {
            resource: HttpSession::new(secret),
            client_id,
            server_url,
        })
    }

    fn authenticate(&self, session: &mut HttpSession) -> LeaseResult<Grant> {
        let nonce = Uuid::new_v4().to_string();
        let request = AuthRequest {
            client_id: session.secret.client_id.clone(),
            nonce: nonce.clone(),
            timestamp: Utc::now().timestamp(),
            device: session.device.clone(),
            fingerprint: session.fingerprint.id().to_string(),
        };

        let response = self.post(session, AUTHENTICATE_PATH, &request, None)?;
        let signature = response
            .headers()
            .get(SERVER_SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().map_err(|e| {
            LeaseError::new(Status::NetworkError, format!("cannot read response body: {e}"))
        })?;

        let signature = signature.ok_or_else(|| {
            LeaseError::new(
                Status::SignatureVerification,
                "response carries no server signature",
            )
        })?;
        session.secret.keys.verify_server(&body, &signature)?;

        let auth: AuthResponse = decode_body(&body)?;
        if auth.nonce != nonce {
            return Err(LeaseError::new(
                Status::SignatureVerification,
                "response nonce does not match request",
            ));
        }
        if auth.token.trim().is_empty() {
            return Err(LeaseError::new(
                Status::JsonStructure,
                "response carries an empty session token",
            ));
        }

        session.token = Some(auth.token.clone());
        info!(client_id = %session.secret.client_id, "license session opened");
        Ok(Grant {
            token: auth.token,
            custom_content: auth.custom_content.filter(|c| !c.is_empty()),
            keepalive_interval: auth
                .keepalive_interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }

    fn keepalive(&self, session: &mut HttpSession) -> LeaseResult<()> {
        let token = session.token.clone().ok_or_else(|| {
            LeaseError::new(Status::NotAuthenticated, "no session token to keep alive")
        })?;
        let request = Self::session_request(session);
        self.post(session, KEEPALIVE_PATH, &request, Some(&token))?;
        debug!(client_id = %session.secret.client_id, "license session extended");
        Ok(())
    }

    fn release(&self, session: &mut HttpSession) -> LeaseResult<()> {
        // The token is gone locally whatever the server says.
        let Some(token) = session.token.take() else {
            return Ok(());
        };
        let request = Self::session_request(session);
        self.post(session, RELEASE_PATH, &request, Some(&token))?;
        info!(client_id = %session.secret.client_id, "license session released");
        Ok(())
    }

    fn set_insecure_tls(&self, session: &mut HttpSession, allow: bool) {
        if session.insecure_tls != allow {
            session.insecure_tls = allow;
            session.client = None;
        }
    }

    fn free(&self, session: HttpSession) {
        debug!(client_id = %session.secret.client_id, "freeing engine resource");
        drop(session);
    }
}

fn build_client(config: &EngineConfig, insecure_tls: bool) -> LeaseResult<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(insecure_tls)
        .build()
        .map_err(|e| LeaseError::new(Status::Generic, format!("cannot build HTTP client: {e}")))
}
