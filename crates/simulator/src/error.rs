//! Error types for simulator supervision.

use thiserror::Error;

/// Errors from launching, polling or stopping the simulator.
#[derive(Debug, Error)]
pub enum SimulatorError {
	#[error("simulator launch command is empty")]
	EmptyCommand,

	#[error("failed to launch {program}: {error}")]
	Spawn { program: String, error: std::io::Error },

	#[error("simulator stdout was not captured")]
	MissingStdout,

	#[error("failed to stop simulator: {0}")]
	Shutdown(#[from] std::io::Error),
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, SimulatorError>;
