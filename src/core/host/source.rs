//! Application source checkout.

use std::fs;
use std::path::Path;

use tracing::info;

use super::{run_checked, CommandRunner, CommandSpec};
use crate::core::config::{RuntimeConfig, SourceConfig};
use crate::error::{HostError, Result};

/// Clone the repository into `install_dir`, or bring an existing checkout up
/// to date, then install its requirements.
///
/// # Errors
///
/// Returns `HostError::NotACheckout` when `install_dir` holds files that are
/// not a git checkout, or `HostError::CommandFailed` when git or the
/// installer fails.
pub fn fetch_source(
    source: &SourceConfig,
    runtime: &RuntimeConfig,
    install_dir: &Path,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let dir = install_dir.display().to_string();

    if install_dir.join(".git").exists() {
        info!(path = %dir, "updating existing checkout");
        let refspec = source.branch.as_deref().unwrap_or("HEAD");
        run_checked(runner, &git_in(&dir).args(["fetch", "origin", refspec]))?;
        run_checked(runner, &git_in(&dir).args(["reset", "--hard", "FETCH_HEAD"]))?;
    } else if has_entries(install_dir) {
        return Err(HostError::NotACheckout(install_dir.to_path_buf()).into());
    } else {
        info!(repository = %source.repository, path = %dir, "cloning");
        let mut clone = CommandSpec::new("git").arg("clone");
        if let Some(branch) = &source.branch {
            clone = clone.args(["--branch", branch.as_str()]);
        }
        run_checked(runner, &clone.args([source.repository.as_str(), dir.as_str()]))?;
    }

    if let (Some(requirements), Some((program, args))) =
        (&source.requirements, runtime.installer.split_first())
    {
        info!(requirements = %requirements, "installing application requirements");
        let spec = CommandSpec::new(program.as_str())
            .args(args.iter().cloned())
            .args(["-r", requirements.as_str()])
            .current_dir(install_dir);
        run_checked(runner, &spec)?;
    }

    Ok(())
}

/// `git` operating on the checkout at `dir`.
///
/// The checkout is owned by the service user after registration, so git's
/// ownership check must be waived for it when running as root.
fn git_in(dir: &str) -> CommandSpec {
    CommandSpec::new("git").args([
        "-c".to_string(),
        format!("safe.directory={}", dir),
        "-C".to_string(),
        dir.to_string(),
    ])
}

fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
