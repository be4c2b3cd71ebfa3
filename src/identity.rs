use std::io::ErrorKind;
use std::num::NonZeroU64;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Result, TriggerError};
use crate::git::GitContext;
use crate::providers::gitlab::ProjectDirectory;

/// GitLab's numeric project identifier.
pub type ProjectId = NonZeroU64;

/// The project and ref a pipeline will be created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub project_id: ProjectId,
    pub ref_: String,
}

/// Inputs the caller may have supplied explicitly.
#[derive(Debug, Clone, Default)]
pub struct TargetHints<'a> {
    pub project_id: Option<ProjectId>,
    pub ref_: Option<&'a str>,
    pub remote: &'a str,
}

/// Resolves the project id and ref for this invocation.
///
/// An explicit project id is used verbatim and neither git nor the project
/// directory is consulted for identity. Otherwise the URL of `hints.remote`
/// is looked up in the directory returned by `load_directory`, which is only
/// called when it is needed. The ref comes from `hints.ref_` or the current
/// branch.
///
/// # Errors
///
/// - [`TriggerError::IdentityUnresolved`] if the remote cannot be read or is
///   not registered in the directory
/// - [`TriggerError::MissingBranch`] if an explicit id was given and the
///   current branch cannot be determined
/// - [`TriggerError::GitContext`] if the current branch cannot be determined
///   for a repository-derived project
/// - any error from `load_directory`
pub fn resolve_target<G, F>(
    hints: &TargetHints<'_>,
    git: &G,
    load_directory: F,
) -> Result<ResolvedTarget>
where
    G: GitContext + ?Sized,
    F: FnOnce() -> Result<ProjectDirectory>,
{
    let project_id = match hints.project_id {
        Some(id) => {
            info!("Using explicit project id {id}");
            id
        }
        None => resolve_from_remote(hints.remote, git, load_directory)?,
    };

    let ref_ = match hints.ref_ {
        Some(ref_) => ref_.to_string(),
        None => match git.current_branch() {
            Ok(branch) => {
                info!("Using current branch {branch}");
                branch
            }
            Err(e) if hints.project_id.is_some() => {
                return Err(TriggerError::MissingBranch {
                    project_id,
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(e),
        },
    };

    Ok(ResolvedTarget { project_id, ref_ })
}

fn resolve_from_remote<G, F>(remote: &str, git: &G, load_directory: F) -> Result<ProjectId>
where
    G: GitContext + ?Sized,
    F: FnOnce() -> Result<ProjectDirectory>,
{
    let url = git.remote_url(remote).map_err(|e| {
        TriggerError::IdentityUnresolved(format!(
            "no --id given and remote '{remote}' is unavailable: {e}"
        ))
    })?;

    let directory = load_directory()?;
    if directory.is_empty() {
        warn!("Project directory is empty, {url} cannot be mapped to a project id");
    }
    let id = directory.lookup(&url).ok_or_else(|| {
        TriggerError::IdentityUnresolved(format!(
            "no project registered for {url} ({} entries in the project directory)",
            directory.len()
        ))
    })?;

    info!("Resolved project id {id} from remote {remote} ({url})");
    Ok(id)
}

/// Reads a project id file such as `.gitlab.id`.
///
/// Returns `None` when the file does not exist.
pub fn read_project_id_file(path: &Path) -> Result<Option<ProjectId>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No project id file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let id = contents.trim().parse::<ProjectId>().map_err(|e| {
        TriggerError::Config(format!(
            "Invalid project id in {}: '{}' ({e})",
            path.display(),
            contents.trim()
        ))
    })?;

    info!("Read project id {id} from {}", path.display());
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pid(id: u64) -> ProjectId {
        ProjectId::new(id).unwrap()
    }

    /// In-memory git context; `None` fields behave like a missing repository.
    #[derive(Default)]
    struct FakeGit {
        remote_url: Option<String>,
        branch: Option<String>,
        remote_calls: Cell<usize>,
    }

    impl FakeGit {
        fn with(remote_url: Option<&str>, branch: Option<&str>) -> Self {
            Self {
                remote_url: remote_url.map(String::from),
                branch: branch.map(String::from),
                remote_calls: Cell::new(0),
            }
        }
    }

    impl GitContext for FakeGit {
        fn remote_url(&self, remote: &str) -> Result<String> {
            self.remote_calls.set(self.remote_calls.get() + 1);
            self.remote_url
                .clone()
                .ok_or_else(|| TriggerError::GitContext(format!("remote '{remote}' is not defined")))
        }

        fn current_branch(&self) -> Result<String> {
            self.branch
                .clone()
                .ok_or_else(|| TriggerError::GitContext("not a git repository".to_string()))
        }
    }

    fn directory(json: &str) -> ProjectDirectory {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        ProjectDirectory::load(file.path()).unwrap()
    }

    fn no_directory() -> Result<ProjectDirectory> {
        panic!("project directory must not be consulted")
    }

    #[test]
    fn test_resolves_from_remote_and_current_branch() {
        let git = FakeGit::with(Some("git@host:g/p.git"), Some("main"));
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let target =
            resolve_target(&hints, &git, || Ok(directory(r#"{"git@host:g/p.git": 42}"#))).unwrap();

        assert_eq!(
            target,
            ResolvedTarget {
                project_id: pid(42),
                ref_: "main".to_string()
            }
        );
    }

    #[test]
    fn test_explicit_id_skips_remote_and_directory() {
        let git = FakeGit::with(Some("git@host:g/p.git"), Some("main"));
        let hints = TargetHints {
            project_id: Some(pid(7)),
            ref_: Some("release"),
            remote: "origin",
        };

        let target = resolve_target(&hints, &git, no_directory).unwrap();

        assert_eq!(target.project_id, pid(7));
        assert_eq!(target.ref_, "release");
        assert_eq!(git.remote_calls.get(), 0);
    }

    #[test]
    fn test_explicit_id_uses_current_branch_when_available() {
        let git = FakeGit::with(None, Some("feature/x"));
        let hints = TargetHints {
            project_id: Some(pid(7)),
            remote: "origin",
            ..Default::default()
        };

        let target = resolve_target(&hints, &git, no_directory).unwrap();

        assert_eq!(target.ref_, "feature/x");
        assert_eq!(git.remote_calls.get(), 0);
    }

    #[test]
    fn test_explicit_id_without_branch_or_git_context() {
        let git = FakeGit::default();
        let hints = TargetHints {
            project_id: Some(pid(7)),
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, no_directory).unwrap_err();

        assert!(matches!(
            err,
            TriggerError::MissingBranch { project_id, .. } if project_id == pid(7)
        ));
    }

    #[test]
    fn test_missing_remote_is_unresolved() {
        let git = FakeGit::with(None, Some("main"));
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, no_directory).unwrap_err();

        assert!(matches!(err, TriggerError::IdentityUnresolved(_)));
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_unregistered_remote_is_unresolved() {
        let git = FakeGit::with(Some("git@host:g/unknown.git"), Some("main"));
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, || Ok(directory(r#"{"git@host:g/p.git": 42}"#)))
            .unwrap_err();

        assert!(matches!(err, TriggerError::IdentityUnresolved(_)));
        assert!(err.to_string().contains("git@host:g/unknown.git"));
    }

    #[test]
    fn test_empty_directory_is_unresolved() {
        let git = FakeGit::with(Some("git@host:g/p.git"), Some("main"));
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, || Ok(ProjectDirectory::default())).unwrap_err();

        assert!(matches!(err, TriggerError::IdentityUnresolved(_)));
    }

    #[test]
    fn test_directory_errors_propagate() {
        let git = FakeGit::with(Some("git@host:g/p.git"), Some("main"));
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, || {
            Err(TriggerError::Config("broken directory".to_string()))
        })
        .unwrap_err();

        assert!(matches!(err, TriggerError::Config(_)));
    }

    #[test]
    fn test_detached_head_without_explicit_ref() {
        let git = FakeGit::with(Some("git@host:g/p.git"), None);
        let hints = TargetHints {
            remote: "origin",
            ..Default::default()
        };

        let err = resolve_target(&hints, &git, || Ok(directory(r#"{"git@host:g/p.git": 42}"#)))
            .unwrap_err();

        assert!(matches!(err, TriggerError::GitContext(_)));
    }

    #[test]
    fn test_explicit_ref_with_repository_identity() {
        let git = FakeGit::with(Some("git@host:g/p.git"), None);
        let hints = TargetHints {
            ref_: Some("v1.2.0"),
            remote: "origin",
            ..Default::default()
        };

        let target =
            resolve_target(&hints, &git, || Ok(directory(r#"{"git@host:g/p.git": 42}"#))).unwrap();

        assert_eq!(target.project_id, pid(42));
        assert_eq!(target.ref_, "v1.2.0");
    }

    #[test]
    fn test_read_project_id_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, " 1234 ").unwrap();

        assert_eq!(read_project_id_file(file.path()).unwrap(), Some(pid(1234)));
    }

    #[test]
    fn test_missing_project_id_file() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(
            read_project_id_file(&dir.path().join(".gitlab.id")).unwrap(),
            None
        );
    }

    #[test]
    fn test_invalid_project_id_file() {
        for contents in ["abc", "0", "-3"] {
            let mut file = NamedTempFile::new().unwrap();
            write!(file, "{contents}").unwrap();

            let err = read_project_id_file(file.path()).unwrap_err();
            assert!(matches!(err, TriggerError::Config(_)), "{contents}");
        }
    }
}
