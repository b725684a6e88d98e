//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading `devtools.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file was readable but is not a valid configuration.
	#[error("failed to parse {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying TOML error.
		error: toml::de::Error,
	},

	/// A poll interval of zero would spin the supervisor.
	#[error("simulator poll interval `{0}` must be greater than zero")]
	ZeroInterval(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
