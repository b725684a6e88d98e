//! Git access for the kinetic-c developer tools.
//!
//! Only two operations are needed: the full hash of `HEAD` for the version
//! header, and `git mv` so the filename migration keeps file history.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from invoking git.
#[derive(Debug, Error)]
pub enum VcsError {
	#[error("git is not available on PATH")]
	GitNotAvailable,
	#[error("git {args} failed: {stderr}")]
	Command {
		/// Space-joined arguments of the failed invocation.
		args: String,
		/// Trimmed standard error of the failed invocation.
		stderr: String,
	},
	#[error("git rev-parse HEAD in {0} returned an empty revision")]
	EmptyRevision(PathBuf),
}

/// Result type for git operations.
pub type Result<T> = std::result::Result<T, VcsError>;

/// A git working tree.
#[derive(Debug, Clone)]
pub struct Git {
	work_tree: PathBuf,
}

impl Git {
	/// Creates a handle for the working tree containing `work_tree`.
	pub fn new(work_tree: impl Into<PathBuf>) -> Self {
		Self {
			work_tree: work_tree.into(),
		}
	}

	pub fn work_tree(&self) -> &Path {
		&self.work_tree
	}

	/// Checks that a git executable can be launched.
	pub fn ensure_available() -> Result<()> {
		Command::new("git")
			.arg("--version")
			.output()
			.map_err(|_| VcsError::GitNotAvailable)?;
		Ok(())
	}

	/// Returns the full commit hash of `HEAD`.
	pub fn head_revision(&self) -> Result<String> {
		let stdout = self.run(["rev-parse", "HEAD"])?;
		let revision = stdout.trim().to_string();
		if revision.is_empty() {
			return Err(VcsError::EmptyRevision(self.work_tree.clone()));
		}
		tracing::debug!(revision = %revision, "vcs.head_revision");
		Ok(revision)
	}

	/// Moves a tracked file with `git mv` so history follows the rename.
	pub fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
		self.run([OsStr::new("mv"), from.as_os_str(), to.as_os_str()])?;
		tracing::debug!(from = %from.display(), to = %to.display(), "vcs.move");
		Ok(())
	}

	fn run<I, S>(&self, args: I) -> Result<String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
		let joined = args
			.iter()
			.map(|a| a.to_string_lossy().into_owned())
			.collect::<Vec<_>>()
			.join(" ");

		let output = Command::new("git")
			.args(&args)
			.current_dir(&self.work_tree)
			.output()
			.map_err(|e| match e.kind() {
				std::io::ErrorKind::NotFound => VcsError::GitNotAvailable,
				_ => VcsError::Command {
					args: joined.clone(),
					stderr: e.to_string(),
				},
			})?;

		if !output.status.success() {
			return Err(VcsError::Command {
				args: joined,
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}

		Ok(String::from_utf8_lossy(&output.stdout).into_owned())
	}
}
