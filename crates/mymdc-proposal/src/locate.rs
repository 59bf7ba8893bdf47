use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{ProposalError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalLocation {
    pub root: PathBuf,
    pub instrument: String,
    pub cycle: String,
}

pub fn proposal_dir_name(proposal: u32) -> String {
    format!("p{:06}", proposal)
}

/// Finds `<data_root>/*/*/p<NNNNNN>` like a shell glob: only instrument and
/// cycle directories are listed, hidden ones skipped, and the first match in
/// name order wins.
pub fn find_proposal(data_root: &Path, proposal: u32) -> Result<ProposalLocation> {
    let wanted = proposal_dir_name(proposal);
    let found = WalkDir::new(data_root)
        .min_depth(2)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|cycle_dir| cycle_dir.path().join(&wanted))
        .find(|candidate| candidate.is_dir());

    let root = found.ok_or_else(|| ProposalError::ProposalNotFound {
        proposal,
        data_root: data_root.to_path_buf(),
    })?;
    let cycle = component_name(root.parent());
    let instrument = component_name(root.parent().and_then(Path::parent));
    tracing::debug!(proposal, root = %root.display(), "located proposal directory");
    Ok(ProposalLocation {
        root,
        instrument,
        cycle,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn component_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
