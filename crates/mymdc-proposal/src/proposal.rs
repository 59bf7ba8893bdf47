use std::fmt;
use std::path::Path;

use crate::client::MyMdcClient;
use crate::config::ProposalConfig;
use crate::error::Result;
use crate::locate::{find_proposal, ProposalLocation};
use crate::models::{RunRecord, Technique};
use crate::render::Renderer;
use crate::timeline::{self, Timeline};

#[derive(Debug)]
pub struct Proposal {
    number: u32,
    location: ProposalLocation,
    mymdc: MyMdcClient,
}

impl Proposal {
    pub fn open(number: u32, config: &ProposalConfig) -> Result<Self> {
        let location = find_proposal(&config.data_root, number)?;
        let mymdc = MyMdcClient::new(number, location.root.clone(), &config.mymdc);
        Ok(Self {
            number,
            location,
            mymdc,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn root(&self) -> &Path {
        &self.location.root
    }

    pub fn instrument(&self) -> &str {
        &self.location.instrument
    }

    pub fn cycle(&self) -> &str {
        &self.location.cycle
    }

    pub fn location(&self) -> &ProposalLocation {
        &self.location
    }

    pub fn mymdc(&mut self) -> &mut MyMdcClient {
        &mut self.mymdc
    }

    pub fn run_record(&mut self, run: u32) -> Result<RunRecord> {
        self.mymdc.run_record(run)
    }

    pub fn run_techniques(&mut self, run: u32) -> Result<Vec<Technique>> {
        self.mymdc.techniques(run)
    }

    pub fn run_sample_name(&mut self, run: u32) -> Result<String> {
        self.mymdc.sample_name(run)
    }

    pub fn run_type(&mut self, run: u32) -> Result<String> {
        self.mymdc.run_type(run)
    }

    pub fn run_timeline(&mut self, run: u32) -> Result<Timeline> {
        let record = self.mymdc.run_record(run)?;
        Ok(timeline::derive(&record))
    }

    pub fn plot_timeline<R: Renderer>(&mut self, run: u32, renderer: &mut R) -> Result<R::Output> {
        let timeline = self.run_timeline(run)?;
        let run_type = self.mymdc.run_type(run)?;
        let sample = self.mymdc.sample_name(run)?;
        let title = format!("p{}, r{} - {} - {}", self.number, run, run_type, sample);
        renderer.render(&title, &timeline)
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proposal({})", self.number)
    }
}
