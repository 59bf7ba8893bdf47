//! Client for the MyMdC run metadata catalog.

pub mod cache;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod locate;
pub mod models;
pub mod proposal;
pub mod render;
pub mod session;
pub mod timeline;

pub use cache::{AccessorKey, EntityCache};
pub use client::MyMdcClient;
pub use config::{ClientConfig, ProposalConfig};
pub use credentials::{CredentialRecord, CredentialResolver, CREDENTIALS_RELATIVE_PATH};
pub use error::{ProposalError, Result};
pub use locate::{find_proposal, ProposalLocation};
pub use models::{RunRecord, Technique};
pub use proposal::Proposal;
pub use render::{Renderer, TextRenderer};
pub use session::{AuthenticatedSession, MetadataSession};
pub use timeline::{derive as derive_timeline, Interval, Timeline, TimelineEvent};
