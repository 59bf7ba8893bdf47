use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProposalError {
    #[error("couldn't find proposal dir for p{proposal:06} under '{data_root}'")]
    ProposalNotFound { proposal: u32, data_root: PathBuf },

    #[error("credential provisioning unavailable for p{proposal:06}: {source}")]
    ProvisioningUnavailable {
        proposal: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("credential file missing: '{path}'")]
    CredentialFileMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential file invalid: '{path}': {detail}")]
    CredentialFileInvalid { path: PathBuf, detail: String },

    #[error("couldn't get run information from mymdc for p{proposal}, r{run}")]
    RunNotFound { proposal: u32, run: u32 },

    #[error("mymdc request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("config error: '{path}': {detail}")]
    Config { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProposalError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ProvisioningUnavailable { .. }
                | Self::CredentialFileMissing { .. }
                | Self::Transport(_)
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) | Self::ProvisioningUnavailable { source: err, .. } => {
                err.status()
            }
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ProposalNotFound { .. } => "proposal_not_found",
            Self::ProvisioningUnavailable { .. } => "provisioning_unavailable",
            Self::CredentialFileMissing { .. } => "credential_file_missing",
            Self::CredentialFileInvalid { .. } => "credential_file_invalid",
            Self::RunNotFound { .. } => "run_not_found",
            Self::Transport(_) => "transport_error",
            Self::Config { .. } => "config_error",
            Self::Io(_) => "io_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProposalError>;
