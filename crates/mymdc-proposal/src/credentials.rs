use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{ProposalError, Result};

pub const CREDENTIALS_RELATIVE_PATH: &str = "usr/mymdc-credentials.yml";

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialRecord {
    pub token: String,
    pub server: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("token", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

pub fn credentials_path(proposal_root: &Path) -> PathBuf {
    proposal_root.join(CREDENTIALS_RELATIVE_PATH)
}

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    proposal: u32,
    proposal_root: PathBuf,
    init_server: String,
    timeout: Duration,
}

impl CredentialResolver {
    pub fn new(
        proposal: u32,
        proposal_root: PathBuf,
        init_server: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            proposal,
            proposal_root,
            init_server: init_server.into(),
            timeout,
        }
    }

    pub fn credentials_path(&self) -> PathBuf {
        credentials_path(&self.proposal_root)
    }

    pub fn resolve(&self) -> Result<CredentialRecord> {
        let path = self.credentials_path();
        if !path.is_file() {
            self.request_tokens()?;
        }
        load_credentials(&path)
    }

    /// Asks the provisioning service to write the credential file. The
    /// response carries no credentials; the file appears out of band.
    fn request_tokens(&self) -> Result<()> {
        let url = format!(
            "{}/api/write_tokens",
            self.init_server.trim_end_matches('/')
        );
        tracing::info!(proposal = self.proposal, %url, "requesting mymdc credentials");
        let proposal_no = self.proposal.to_string();
        let params = [
            ("proposal_no", proposal_no.as_str()),
            ("kinds", "mymdc"),
            ("overwrite", "false"),
            ("dry_run", "false"),
        ];
        let unavailable = |source: reqwest::Error| ProposalError::ProvisioningUnavailable {
            proposal: self.proposal,
            source,
        };
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(unavailable)?;
        client
            .post(&url)
            .query(&params)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(unavailable)?;
        Ok(())
    }
}

pub fn load_credentials(path: &Path) -> Result<CredentialRecord> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            ProposalError::CredentialFileMissing {
                path: path.to_path_buf(),
                source,
            }
        }
        _ => ProposalError::Io(source),
    })?;
    let record: CredentialRecord =
        serde_yaml::from_str(&raw).map_err(|e| ProposalError::CredentialFileInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    if record.token.is_empty() || record.server.is_empty() {
        return Err(ProposalError::CredentialFileInvalid {
            path: path.to_path_buf(),
            detail: "token and server must be non-empty".to_string(),
        });
    }
    Ok(record)
}
