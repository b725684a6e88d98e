//! The mock generation capability and its CMock implementation.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{MockError, Result};
use crate::headers::HeaderSet;

/// Generates test doubles for a header set into an output directory.
pub trait MockGenerator {
	/// Runs generation once. Failures are reported as-is and never retried.
	fn generate(&self, headers: &HeaderSet, out_dir: &Path) -> Result<()>;
}

/// Behavioral plugins enabled on the generated mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPlugin {
	/// Calls without expectations are allowed.
	Ignore,
	/// Output pointer arguments can be filled by the mock.
	ReturnThruPtr,
}

impl MockPlugin {
	/// Plugin name as CMock spells it.
	pub const fn cmock_name(self) -> &'static str {
		match self {
			Self::Ignore => "ignore",
			Self::ReturnThruPtr => "return_thru_ptr",
		}
	}
}

/// Plugin set used for kinetic-c unit tests.
pub const DEFAULT_PLUGINS: [MockPlugin; 2] = [MockPlugin::Ignore, MockPlugin::ReturnThruPtr];

/// Runs the CMock command line tool.
#[derive(Debug, Clone)]
pub struct CmockGenerator {
	command: Vec<String>,
	plugins: Vec<MockPlugin>,
	working_dir: Option<PathBuf>,
}

impl CmockGenerator {
	/// `command` is the program followed by its leading arguments, such as
	/// `["ruby", "vendor/cmock/lib/cmock.rb"]`.
	pub fn new(command: Vec<String>) -> Self {
		Self {
			command,
			plugins: DEFAULT_PLUGINS.to_vec(),
			working_dir: None,
		}
	}

	#[must_use]
	pub fn with_plugins(mut self, plugins: impl IntoIterator<Item = MockPlugin>) -> Self {
		self.plugins = plugins.into_iter().collect();
		self
	}

	/// Directory the command runs in, so relative script paths resolve.
	#[must_use]
	pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.working_dir = Some(dir.into());
		self
	}

	fn plugin_arg(&self) -> String {
		let names: Vec<_> = self.plugins.iter().map(|p| p.cmock_name()).collect();
		format!("--plugins={}", names.join(";"))
	}
}

impl MockGenerator for CmockGenerator {
	fn generate(&self, headers: &HeaderSet, out_dir: &Path) -> Result<()> {
		let (program, leading) = self.command.split_first().ok_or(MockError::EmptyCommand)?;

		let mut command = Command::new(program);
		command
			.args(leading)
			.arg(format!("--mock_path={}", out_dir.display()))
			.arg(self.plugin_arg())
			.args(headers.paths())
			.stdout(Stdio::inherit())
			.stderr(Stdio::piped());
		if let Some(dir) = &self.working_dir {
			command.current_dir(dir);
		}

		tracing::info!(program = %program, headers = headers.len(), out_dir = %out_dir.display(), "mocks.generate");
		let output = command.output().map_err(|error| MockError::Spawn {
			program: program.clone(),
			error,
		})?;

		if !output.status.success() {
			return Err(MockError::ExternalTool {
				program: program.clone(),
				status: output.status,
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_plugins_render_as_cmock_option() {
		let generator = CmockGenerator::new(vec!["cmock".to_string()]);
		assert_eq!(generator.plugin_arg(), "--plugins=ignore;return_thru_ptr");
	}

	#[test]
	fn empty_command_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let err = CmockGenerator::new(Vec::new())
			.generate(&HeaderSet::default(), dir.path())
			.unwrap_err();
		assert!(matches!(err, MockError::EmptyCommand));
	}

	#[test]
	fn unknown_program_is_spawn_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = CmockGenerator::new(vec!["kinetic-devtools-no-such-cmock".to_string()])
			.generate(&HeaderSet::default(), dir.path())
			.unwrap_err();
		assert!(matches!(err, MockError::Spawn { .. }));
	}

	#[cfg(unix)]
	#[test]
	fn failing_tool_surfaces_status_and_stderr() {
		let dir = tempfile::tempdir().unwrap();
		let generator = CmockGenerator::new(vec![
			"sh".to_string(),
			"-c".to_string(),
			"echo 'ERROR: unparsable header' >&2; exit 3".to_string(),
		]);

		match generator.generate(&HeaderSet::default(), dir.path()).unwrap_err() {
			MockError::ExternalTool { program, status, stderr } => {
				assert_eq!(program, "sh");
				assert_eq!(status.code(), Some(3));
				assert_eq!(stderr, "ERROR: unparsable header");
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
