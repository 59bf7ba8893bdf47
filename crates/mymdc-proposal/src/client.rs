use std::path::PathBuf;

use crate::cache::{AccessorKey, EntityCache};
use crate::config::ClientConfig;
use crate::credentials::CredentialResolver;
use crate::error::{ProposalError, Result};
use crate::models::{NamedEntity, RunDetail, RunList, RunRecord, Technique};
use crate::session::MetadataSession;

#[derive(Debug)]
pub struct MyMdcClient {
    proposal: u32,
    session: MetadataSession,
    run_records: EntityCache<RunRecord>,
    techniques: EntityCache<Vec<Technique>>,
    names: EntityCache<String>,
}

impl MyMdcClient {
    pub fn new(proposal: u32, proposal_root: PathBuf, config: &ClientConfig) -> Self {
        let resolver = CredentialResolver::new(
            proposal,
            proposal_root,
            config.init_server.clone(),
            config.timeout(),
        );
        Self {
            proposal,
            session: MetadataSession::new(resolver, config.timeout()),
            run_records: EntityCache::new(config.enable_cache),
            techniques: EntityCache::new(config.enable_cache),
            names: EntityCache::new(config.enable_cache),
        }
    }

    pub fn proposal(&self) -> u32 {
        self.proposal
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_ready()
    }

    pub fn clear_cache(&mut self) {
        self.run_records.clear();
        self.techniques.clear();
        self.names.clear();
    }

    pub fn run_record(&mut self, run: u32) -> Result<RunRecord> {
        if let Some(hit) = self.run_records.get(run, AccessorKey::RunRecord) {
            return Ok(hit.clone());
        }
        let session = self.session.session()?;
        let list: RunList = session.get_json(&format!(
            "/api/mymdc/proposals/by_number/{}/runs/{}",
            self.proposal, run
        ))?;
        let record = list
            .runs
            .into_iter()
            .next()
            .ok_or(ProposalError::RunNotFound {
                proposal: self.proposal,
                run,
            })?;
        self.run_records
            .put(run, AccessorKey::RunRecord, record.clone());
        Ok(record)
    }

    pub fn techniques(&mut self, run: u32) -> Result<Vec<Technique>> {
        if let Some(hit) = self.techniques.get(run, AccessorKey::Techniques) {
            return Ok(hit.clone());
        }
        let record = self.run_record(run)?;
        let session = self.session.session()?;
        let detail: RunDetail = session.get_json(&format!("/api/mymdc/runs/{}", record.id))?;
        self.techniques
            .put(run, AccessorKey::Techniques, detail.techniques.clone());
        Ok(detail.techniques)
    }

    pub fn sample_name(&mut self, run: u32) -> Result<String> {
        if let Some(hit) = self.names.get(run, AccessorKey::SampleName) {
            return Ok(hit.clone());
        }
        let record = self.run_record(run)?;
        let path = format!("/api/mymdc/samples/{}", record.sample_id);
        self.fetch_name(run, AccessorKey::SampleName, &path)
    }

    pub fn run_type(&mut self, run: u32) -> Result<String> {
        if let Some(hit) = self.names.get(run, AccessorKey::RunType) {
            return Ok(hit.clone());
        }
        let record = self.run_record(run)?;
        let path = format!("/api/mymdc/experiments/{}", record.experiment_id);
        self.fetch_name(run, AccessorKey::RunType, &path)
    }

    fn fetch_name(&mut self, run: u32, key: AccessorKey, path: &str) -> Result<String> {
        let session = self.session.session()?;
        let entity: NamedEntity = session.get_json(path)?;
        self.names.put(run, key, entity.name.clone());
        Ok(entity.name)
    }
}
