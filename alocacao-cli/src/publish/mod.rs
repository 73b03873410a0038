//! Publishes the consolidated report through an external git client

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use uuid::Uuid;

/// Pushes a written report to wherever it is served from.
///
/// Injected into the CLI handler so the consolidation pipeline can run and
/// be tested without touching version control.
pub trait Publisher {
    fn publish(&self, path: &Path) -> Result<()>;
}

/// Stages, commits and pushes the report with the system git client.
pub struct GitPublisher {
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        GitPublisher {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    fn run_git(args: &[&str]) -> Result<()> {
        debug!("running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .output()
            .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Report path is not valid UTF-8")?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path_str);

        Self::run_git(&["add", path_str])?;
        Self::run_git(&["commit", "-m", &commit_message(file_name)])?;
        Self::run_git(&["push", &self.remote, &self.branch])?;

        info!("report pushed to {}/{}", self.remote, self.branch);
        Ok(())
    }
}

/// Commit message carrying a unique id so repeated runs never collide.
fn commit_message(file_name: &str) -> String {
    format!("Atualiza {} - ID: {}", file_name, Uuid::new_v4())
}
