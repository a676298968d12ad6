//! Remote URL lookup for reference path derivation

use std::path::Path;
use std::process::Command;

use super::DerivationUnavailable;

/// Looks up the remote URL of the repository containing a directory.
pub trait RemoteLookup {
    fn remote_url(&self, dir: &Path) -> Result<String, DerivationUnavailable>;
}

/// Queries the `git` command line client.
#[derive(Debug, Clone)]
pub struct GitRemote {
    program: String,
}

impl GitRemote {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable instead of the one on `PATH`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteLookup for GitRemote {
    fn remote_url(&self, dir: &Path) -> Result<String, DerivationUnavailable> {
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(["ls-remote", "--get-url"])
            .output()
            .map_err(|source| DerivationUnavailable::ClientMissing {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DerivationUnavailable::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if url.is_empty() {
            return Err(DerivationUnavailable::EmptyUrl);
        }
        Ok(url)
    }
}

/// Extract `(owner, repo)` from a git remote URL.
///
/// Accepts scp-like (`git@host:owner/repo.git`) and URL forms
/// (`https://host/owner/repo.git`, `ssh://git@host/owner/repo`).
/// The last segment is the repo and everything before it is the owner, so
/// nested groups (`gitlab.com/group/sub/repo`) give owner `group/sub`.
/// Returns `None` when the path has fewer than two segments, which is
/// what `git ls-remote --get-url` prints for a repo with no remotes.
pub fn parse_git_url(url: &str) -> Option<(String, String)> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let path = if let Some((_, rest)) = url.split_once("://") {
        // drop the host (and any user/port) before the first slash
        rest.split_once('/')?.1
    } else {
        url.split_once(':')?.1
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (repo, owner) = segments.split_last()?;
    if owner.is_empty() {
        return None;
    }
    Some((owner.join("/"), repo.to_string()))
}
