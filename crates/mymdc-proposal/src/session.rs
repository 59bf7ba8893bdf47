use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::credentials::{CredentialRecord, CredentialResolver};
use crate::error::{ProposalError, Result};

/// Sent as `X-API-key`; header names are case-insensitive on the wire.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    client: Client,
    server: String,
}

impl AuthenticatedSession {
    pub fn new(credentials: &CredentialRecord, timeout: Duration) -> Result<Self> {
        let mut token = HeaderValue::from_str(&credentials.token).map_err(|e| {
            ProposalError::CredentialFileInvalid {
                path: Default::default(),
                detail: format!("token is not a valid header value: {}", e),
            }
        })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), token);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            server: credentials.server.trim_end_matches('/').to_string(),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.server, path);
        tracing::debug!(%url, "mymdc GET");
        let value = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json::<T>()?;
        Ok(value)
    }
}

/// A failed initialization is never stored: it is returned to the caller
/// and the state stays `Uninitialized`.
#[derive(Debug)]
enum SessionState {
    Uninitialized,
    Ready(AuthenticatedSession),
}

#[derive(Debug)]
pub struct MetadataSession {
    resolver: CredentialResolver,
    timeout: Duration,
    state: SessionState,
}

impl MetadataSession {
    pub fn new(resolver: CredentialResolver, timeout: Duration) -> Self {
        Self {
            resolver,
            timeout,
            state: SessionState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn session(&mut self) -> Result<AuthenticatedSession> {
        if let SessionState::Ready(session) = &self.state {
            return Ok(session.clone());
        }
        let session = self.initialize().map_err(|err| {
            tracing::warn!(error = %err, "mymdc session initialization failed");
            err
        })?;
        self.state = SessionState::Ready(session.clone());
        Ok(session)
    }

    fn initialize(&self) -> Result<AuthenticatedSession> {
        let credentials = self.resolver.resolve()?;
        let session = AuthenticatedSession::new(&credentials, self.timeout).map_err(|err| {
            match err {
                ProposalError::CredentialFileInvalid { detail, .. } => {
                    ProposalError::CredentialFileInvalid {
                        path: self.resolver.credentials_path(),
                        detail,
                    }
                }
                other => other,
            }
        })?;
        tracing::info!(server = session.server(), "mymdc session established");
        Ok(session)
    }
}
