//! Source tree enumeration for the migration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::Result;

/// Compiles the source globs into one matcher.
pub fn build_globs(globs: &[String]) -> Result<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for glob in globs {
		builder.add(Glob::new(glob)?);
	}
	Ok(builder.build()?)
}

/// Lists files under `roots` whose root-relative path matches `globs`.
///
/// Missing roots and unreadable entries are logged and skipped. The result is
/// sorted and free of duplicates.
pub fn scan(roots: &[PathBuf], globs: &GlobSet) -> Vec<PathBuf> {
	let mut files = Vec::new();

	for root in roots {
		if !root.is_dir() {
			tracing::warn!(root = %root.display(), "rename.scan.missing_root");
			continue;
		}

		for entry in WalkBuilder::new(root).build() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					tracing::warn!(root = %root.display(), error = %e, "rename.scan.error");
					continue;
				}
			};
			if !entry.file_type().is_some_and(|t| t.is_file()) {
				continue;
			}
			if matches_relative(root, entry.path(), globs) {
				files.push(entry.into_path());
			}
		}
	}

	files.sort();
	files.dedup();
	files
}

fn matches_relative(root: &Path, path: &Path, globs: &GlobSet) -> bool {
	let relative = path.strip_prefix(root).unwrap_or(path);
	globs.is_match(relative)
}
