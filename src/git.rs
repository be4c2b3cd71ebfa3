use std::path::PathBuf;

use git2::{ErrorCode, Repository};
use log::debug;

use crate::error::{Result, TriggerError};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Read-only view of the local repository the CLI is invoked from.
///
/// Only consulted when the caller did not pass the corresponding value
/// explicitly, so a git checkout is not required for fully explicit runs.
pub trait GitContext {
    /// Fetch URL of the remote called `remote`.
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Name of the checked-out branch.
    fn current_branch(&self) -> Result<String>;
}

/// [`GitContext`] backed by the repository discovered from a directory.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    path: PathBuf,
}

impl LocalRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<Repository> {
        Repository::discover(&self.path).map_err(|_| {
            TriggerError::GitContext(format!("not a git repository: {}", self.path.display()))
        })
    }
}

impl GitContext for LocalRepository {
    fn remote_url(&self, remote: &str) -> Result<String> {
        let repo = self.open()?;
        let found = match repo.find_remote(remote) {
            Ok(found) => found,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(TriggerError::GitContext(format!(
                    "remote '{remote}' is not defined"
                )))
            }
            Err(e) => return Err(TriggerError::GitContext(e.message().to_string())),
        };

        let url = found.url().ok_or_else(|| {
            TriggerError::GitContext(format!("remote '{remote}' has no readable URL"))
        })?;

        debug!("Remote {remote} resolves to {url}");
        Ok(url.to_string())
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo
            .find_reference("HEAD")
            .map_err(|e| TriggerError::GitContext(format!("cannot read HEAD: {}", e.message())))?;

        let target = head
            .symbolic_target()
            .ok_or_else(|| TriggerError::GitContext("HEAD is detached".to_string()))?;

        let branch = branch_from_ref(target)?;
        debug!("Current branch is {branch}");
        Ok(branch.to_string())
    }
}

/// Extracts the branch name from a `refs/heads/...` reference.
///
/// The whole remainder is kept, so `refs/heads/feature/login` gives
/// `feature/login` and not just its last segment.
///
/// Anything else HEAD might point at is rejected rather than guessed.
pub fn branch_from_ref(refname: &str) -> Result<&str> {
    match refname.strip_prefix(BRANCH_REF_PREFIX) {
        Some(branch) if !branch.is_empty() => Ok(branch),
        _ => Err(TriggerError::GitContext(format!(
            "HEAD points to unexpected reference '{refname}'"
        ))),
    }
}
