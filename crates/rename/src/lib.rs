//! One-shot migration of legacy CamelCase kinetic-c sources.
//!
//! Every file under the configured roots is matched against the legacy
//! grammar ([`grammar::parse_legacy_name`]). Matching files are moved to their
//! snake_case name in the same directory through a [`PathMover`], normally
//! `git mv`, so history follows the rename. Names that do not fit the grammar
//! are reported and left alone; nothing aborts the batch. Renamed files no
//! longer match, so an interrupted run can simply be repeated.

pub mod grammar;
pub mod scan;


use std::fmt;
use std::path::{Path, PathBuf};

pub use grammar::{LegacyName, parse_legacy_name};
use kinetic_devtools_vcs::{Git, VcsError};
pub use scan::{build_globs, scan};
use thiserror::Error;

/// Errors that prevent the migration from starting.
#[derive(Debug, Error)]
pub enum RenameError {
	#[error("invalid source glob: {0}")]
	Glob(#[from] globset::Error),
}

/// Result type for rename operations.
pub type Result<T> = std::result::Result<T, RenameError>;

/// Moves a file while preserving its version control history.
pub trait PathMover {
	fn move_path(&self, from: &Path, to: &Path) -> std::result::Result<(), VcsError>;
}

impl PathMover for Git {
	fn move_path(&self, from: &Path, to: &Path) -> std::result::Result<(), VcsError> {
		Git::move_path(self, from, to)
	}
}

/// Migration settings.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
	/// Globs matched against root-relative paths.
	pub globs: Vec<String>,
	/// Keep a leading `test` marker in the new name.
	pub keep_test_marker: bool,
}

/// A file that matched the grammar, with its computed new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCandidate {
	pub original_path: PathBuf,
	pub segments: Vec<String>,
	pub suffix: String,
}

impl RenameCandidate {
	/// Builds a candidate if `path`'s file name fits the grammar.
	pub fn from_path(path: &Path, keep_test_marker: bool) -> Option<Self> {
		let name = path.file_name()?.to_str()?;
		let LegacyName::Matched {
			test_marker,
			mut segments,
			suffix,
		} = parse_legacy_name(name)
		else {
			return None;
		};

		if keep_test_marker && test_marker {
			segments.insert(0, "test".to_string());
		}
		Some(Self {
			original_path: path.to_path_buf(),
			segments,
			suffix,
		})
	}

	pub fn file_name(&self) -> String {
		format!("{}{}", self.segments.join("_"), self.suffix)
	}

	/// New path in the same directory.
	pub fn renamed_path(&self) -> PathBuf {
		self.original_path.with_file_name(self.file_name())
	}
}

/// Why a file was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
	/// The name does not fit the legacy grammar.
	PatternMismatch,
	/// A file with the canonical name already exists.
	TargetExists(PathBuf),
	/// The mover reported an error.
	MoveFailed(String),
}

/// Outcome for one scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameEntry {
	Renamed { from: PathBuf, to: PathBuf },
	Skipped { path: PathBuf, reason: SkipReason },
}

/// Outcome of one migration run, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
	pub entries: Vec<RenameEntry>,
}

impl RenameReport {
	pub fn renamed(&self) -> impl Iterator<Item = (&Path, &Path)> {
		self.entries.iter().filter_map(|entry| match entry {
			RenameEntry::Renamed { from, to } => Some((from.as_path(), to.as_path())),
			RenameEntry::Skipped { .. } => None,
		})
	}

	pub fn skipped(&self) -> impl Iterator<Item = (&Path, &SkipReason)> {
		self.entries.iter().filter_map(|entry| match entry {
			RenameEntry::Skipped { path, reason } => Some((path.as_path(), reason)),
			RenameEntry::Renamed { .. } => None,
		})
	}
}

/// Renames every legacy-named file under `roots`.
pub fn normalize<M>(roots: &[PathBuf], options: &NormalizeOptions, mover: &M) -> Result<RenameReport>
where
	M: PathMover + ?Sized,
{
	let globs = build_globs(&options.globs)?;
	let files = scan(roots, &globs);
	tracing::info!(files = files.len(), "rename.scan");

	let mut report = RenameReport::default();
	for path in files {
		report.entries.push(rename_one(path, options.keep_test_marker, mover));
	}
	Ok(report)
}

fn rename_one<M>(path: PathBuf, keep_test_marker: bool, mover: &M) -> RenameEntry
where
	M: PathMover + ?Sized,
{
	let Some(candidate) = RenameCandidate::from_path(&path, keep_test_marker) else {
		tracing::debug!(path = %path.display(), "rename.skip");
		return RenameEntry::Skipped {
			path,
			reason: SkipReason::PatternMismatch,
		};
	};

	let target = candidate.renamed_path();
	if target.exists() {
		tracing::warn!(path = %path.display(), target = %target.display(), "rename.target_exists");
		return RenameEntry::Skipped {
			path,
			reason: SkipReason::TargetExists(target),
		};
	}

	match mover.move_path(&path, &target) {
		Ok(()) => {
			tracing::info!(from = %path.display(), to = %target.display(), "rename.move");
			RenameEntry::Renamed { from: path, to: target }
		}
		Err(e) => {
			tracing::warn!(path = %path.display(), error = %e, "rename.move_failed");
			RenameEntry::Skipped {
				path,
				reason: SkipReason::MoveFailed(e.to_string()),
			}
		}
	}
}

impl fmt::Display for RenameEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Renamed { from, to } => write!(f, "old: {}\t\t=>\t\t{}", from.display(), to.display()),
			Self::Skipped { path, reason } => {
				let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
				match reason {
					SkipReason::PatternMismatch => write!(f, "Skipping {name}!"),
					SkipReason::TargetExists(target) => {
						write!(f, "Skipping {name}! ({} already exists)", target.display())
					}
					SkipReason::MoveFailed(error) => write!(f, "Skipping {name}! ({error})"),
				}
			}
		}
	}
}

impl fmt::Display for RenameReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for entry in &self.entries {
			writeln!(f, "{entry}")?;
		}
		write!(
			f,
			"{} renamed, {} skipped",
			self.renamed().count(),
			self.skipped().count()
		)
	}
}
