//! CMock orchestration for kinetic-c unit tests.
//!
//! The public headers are handed to an external mock generator in one
//! invocation; the output directory is owned by the run and whatever `mock_*`
//! files it holds afterwards are reported. Headers are not validated here, so
//! a malformed header fails inside the generator and is attributed to it.

pub mod error;
pub mod generator;
pub mod headers;


use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use error::{MockError, Result};
pub use generator::{CmockGenerator, DEFAULT_PLUGINS, MockGenerator, MockPlugin};
pub use headers::HeaderSet;

/// File name prefix the generator puts in front of each header name.
pub const MOCK_PREFIX: &str = "mock_";

/// A generated mock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockArtifact {
	pub path: PathBuf,
	/// Base name of the header this mock was generated from.
	pub header_stem: String,
}

impl MockArtifact {
	/// The header mock expected in `out_dir` for `header`.
	pub fn expected_for(header: &Path, out_dir: &Path) -> Option<Self> {
		let name = header.file_name()?.to_str()?;
		let stem = header.file_stem()?.to_str()?;
		Some(Self {
			path: out_dir.join(format!("{MOCK_PREFIX}{name}")),
			header_stem: stem.to_string(),
		})
	}

	fn from_path(path: PathBuf) -> Option<Self> {
		let stem = path.file_stem()?.to_str()?;
		let header_stem = stem.strip_prefix(MOCK_PREFIX)?.to_string();
		Some(Self { path, header_stem })
	}
}

/// Outcome of one mock generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReport {
	pub headers: HeaderSet,
	pub out_dir: PathBuf,
	pub artifacts: Vec<MockArtifact>,
}

impl MockReport {
	/// Headers without a `mock_<name>` file in the output directory.
	pub fn unmocked_headers(&self) -> Vec<&Path> {
		self.headers
			.paths()
			.iter()
			.filter(|header| {
				MockArtifact::expected_for(header, &self.out_dir)
					.is_none_or(|expected| !self.artifacts.contains(&expected))
			})
			.map(PathBuf::as_path)
			.collect()
	}
}

/// Generates mocks for `headers` into `out_dir` and reports the result.
pub fn create_mocks<G>(generator: &G, headers: &HeaderSet, out_dir: &Path) -> Result<MockReport>
where
	G: MockGenerator + ?Sized,
{
	fs::create_dir_all(out_dir).map_err(|e| MockError::io(out_dir, e))?;

	generator.generate(headers, out_dir)?;

	let artifacts = list_artifacts(out_dir)?;
	let report = MockReport {
		headers: headers.clone(),
		out_dir: out_dir.to_path_buf(),
		artifacts,
	};

	for header in report.unmocked_headers() {
		tracing::warn!(header = %header.display(), "mocks.missing");
	}
	tracing::info!(artifacts = report.artifacts.len(), "mocks.done");
	Ok(report)
}

/// Lists every `mock_*` file in `out_dir`, sorted by path.
pub fn list_artifacts(out_dir: &Path) -> Result<Vec<MockArtifact>> {
	let entries = fs::read_dir(out_dir).map_err(|e| MockError::io(out_dir, e))?;

	let mut artifacts = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|e| MockError::io(out_dir, e))?;
		let is_file = entry.file_type().map_err(|e| MockError::io(entry.path(), e))?.is_file();
		if is_file && let Some(artifact) = MockArtifact::from_path(entry.path()) {
			artifacts.push(artifact);
		}
	}
	artifacts.sort_by(|a, b| a.path.cmp(&b.path));
	Ok(artifacts)
}

impl fmt::Display for MockReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Mocked headers:")?;
		writeln!(f, "---------------")?;
		for header in self.headers.paths() {
			writeln!(f, "{}", header.display())?;
		}
		writeln!(f)?;
		writeln!(f, "Generated mocks:")?;
		write!(f, "----------------")?;
		for artifact in &self.artifacts {
			write!(f, "\n{}", artifact.path.display())?;
		}
		Ok(())
	}
}
