//! Discovery of the public header set handed to the mock generator.

use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;

use crate::error::{MockError, Result};

/// Headers directly under one directory, in file name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
	paths: Vec<PathBuf>,
}

impl HeaderSet {
	/// Collects regular files in `dir` whose name matches `glob`.
	///
	/// Subdirectories are not descended into. Header contents are not
	/// inspected.
	pub fn discover(dir: &Path, glob: &str) -> Result<Self> {
		let matcher = Glob::new(glob)?.compile_matcher();
		let entries = fs::read_dir(dir).map_err(|e| MockError::io(dir, e))?;

		let mut paths = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|e| MockError::io(dir, e))?;
			let file_type = entry.file_type().map_err(|e| MockError::io(entry.path(), e))?;
			if file_type.is_file() && matcher.is_match(entry.file_name()) {
				paths.push(entry.path());
			}
		}
		paths.sort();

		tracing::debug!(dir = %dir.display(), glob, count = paths.len(), "mocks.headers");
		Ok(Self { paths })
	}

	pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
		Self {
			paths: paths.into_iter().collect(),
		}
	}

	pub fn paths(&self) -> &[PathBuf] {
		&self.paths
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}
}
