//! Error types for mock generation.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while discovering headers or generating mocks.
#[derive(Debug, Error)]
pub enum MockError {
	#[error("I/O error on {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("invalid header glob: {0}")]
	Glob(#[from] globset::Error),

	#[error("mock generator command is empty")]
	EmptyCommand,

	#[error("failed to launch {program}: {error}")]
	Spawn { program: String, error: std::io::Error },

	/// The generator ran and reported failure. Its diagnostics are passed
	/// through untouched.
	#[error("{program} exited with {status}: {stderr}")]
	ExternalTool {
		program: String,
		status: ExitStatus,
		stderr: String,
	},
}

impl MockError {
	pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			error,
		}
	}
}

/// Result type for mock operations.
pub type Result<T> = std::result::Result<T, MockError>;
