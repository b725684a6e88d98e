//! Error types for version header generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while synthesizing the version header.
#[derive(Debug, Error)]
pub enum VersionInfoError {
	/// No line of the generated source declares the protocol version.
	#[error("protocol version declaration not found in {path}")]
	Extraction {
		/// The generated source that was scanned.
		path: PathBuf,
	},

	/// A descriptor field was empty after trimming.
	#[error("{field} is empty")]
	EmptyField {
		/// Name of the offending descriptor field.
		field: &'static str,
	},

	/// Error reading an input or writing the header.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the file being read or written.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The configured symbol produced an invalid declaration pattern.
	#[error("invalid protocol version pattern: {0}")]
	Pattern(#[from] regex::Error),
}

impl VersionInfoError {
	pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			error,
		}
	}
}

/// Result type for version header operations.
pub type Result<T> = std::result::Result<T, VersionInfoError>;
