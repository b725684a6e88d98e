//! Configuration for the kinetic-c developer tools.
//!
//! Every tool reads an optional `devtools.toml` at the project root. All keys
//! have defaults matching the kinetic-c tree layout, so a missing file is the
//! same as an empty one.
//!
//! ```toml
//! [version-info]
//! version-file = "config/VERSION"
//! protocol-source = "src/lib/kinetic_proto.c"
//! protocol-symbol = "KineticProto_local_protocol_version_default_value"
//! output = "src/lib/kinetic_version_info.h"
//!
//! [mocks]
//! header-dir = "src/lib"
//! header-glob = "*.h"
//! output-dir = "build/test/mocks"
//! command = ["ruby", "vendor/cmock/lib/cmock.rb"]
//!
//! [rename]
//! roots = ["src", "test"]
//! globs = ["**/*.c", "**/*.h"]
//! keep-test-marker = false
//!
//! [simulator]
//! port = 8123
//! waiting-interval-ms = 250
//! connected-interval-ms = 1000
//! ```
//!
//! Relative paths are resolved against the project root with [`resolve_path`].

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// File name looked up at the project root when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "devtools.toml";

/// Well-known Kinetic protocol port.
pub const DEFAULT_KINETIC_PORT: u16 = 8123;

/// Parsed `devtools.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DevtoolsConfig {
	/// Settings for `generate-version-info`.
	pub version_info: VersionInfoConfig,
	/// Settings for `create-mocks`.
	pub mocks: MockConfig,
	/// Settings for `rename-sources`.
	pub rename: RenameConfig,
	/// Settings for `kinetic-simulator`.
	pub simulator: SimulatorConfig,
}

/// Inputs and output of the version header generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct VersionInfoConfig {
	/// File whose trimmed contents is the project version.
	pub version_file: PathBuf,
	/// Generated protobuf-c source carrying the protocol version literal.
	pub protocol_source: PathBuf,
	/// Symbol holding the protocol version. Empty accepts any `char` array.
	pub protocol_symbol: String,
	/// Generated header path.
	pub output: PathBuf,
}

impl Default for VersionInfoConfig {
	fn default() -> Self {
		Self {
			version_file: PathBuf::from("config/VERSION"),
			protocol_source: PathBuf::from("src/lib/kinetic_proto.c"),
			protocol_symbol: "KineticProto_local_protocol_version_default_value".to_string(),
			output: PathBuf::from("src/lib/kinetic_version_info.h"),
		}
	}
}

/// Mock generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MockConfig {
	/// Directory holding the headers to mock. Not searched recursively.
	pub header_dir: PathBuf,
	/// File name glob applied inside `header_dir`.
	pub header_glob: String,
	/// Directory owned by the mock generator.
	pub output_dir: PathBuf,
	/// Program and leading arguments used to invoke CMock.
	pub command: Vec<String>,
}

impl Default for MockConfig {
	fn default() -> Self {
		Self {
			header_dir: PathBuf::from("src/lib"),
			header_glob: "*.h".to_string(),
			output_dir: PathBuf::from("build/test/mocks"),
			command: vec!["ruby".to_string(), "vendor/cmock/lib/cmock.rb".to_string()],
		}
	}
}

/// Legacy filename migration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RenameConfig {
	/// Directories scanned for legacy names.
	pub roots: Vec<PathBuf>,
	/// Globs matched against paths relative to each root.
	pub globs: Vec<String>,
	/// Keep a leading `test` marker as the first segment of the new name.
	pub keep_test_marker: bool,
}

impl Default for RenameConfig {
	fn default() -> Self {
		Self {
			roots: vec![PathBuf::from("src"), PathBuf::from("test")],
			globs: vec!["**/*.c".to_string(), "**/*.h".to_string()],
			keep_test_marker: false,
		}
	}
}

/// Simulator supervision settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SimulatorConfig {
	/// Port the simulator listens on.
	pub port: u16,
	/// Replacement launch command. `{port}` in any argument is replaced with
	/// [`port`](Self::port). `None` uses the bundled kinetic-ruby bootstrap.
	pub command: Option<Vec<String>>,
	/// Poll interval while no client is connected.
	pub waiting_interval_ms: u64,
	/// Poll interval while a client is connected.
	pub connected_interval_ms: u64,
	/// Time allowed for the simulator to exit after SIGTERM before it is killed.
	pub shutdown_grace_ms: u64,
}

impl Default for SimulatorConfig {
	fn default() -> Self {
		Self {
			port: DEFAULT_KINETIC_PORT,
			command: None,
			waiting_interval_ms: 250,
			connected_interval_ms: 1_000,
			shutdown_grace_ms: 2_000,
		}
	}
}

impl SimulatorConfig {
	pub fn waiting_interval(&self) -> Duration {
		Duration::from_millis(self.waiting_interval_ms)
	}

	pub fn connected_interval(&self) -> Duration {
		Duration::from_millis(self.connected_interval_ms)
	}

	pub fn shutdown_grace(&self) -> Duration {
		Duration::from_millis(self.shutdown_grace_ms)
	}
}

impl DevtoolsConfig {
	/// Parse a TOML string into a [`DevtoolsConfig`].
	///
	/// `path` is only used to attribute errors.
	pub fn parse(input: &str, path: &Path) -> Result<Self> {
		let config: Self = toml::from_str(input).map_err(|error| ConfigError::Parse {
			path: path.to_path_buf(),
			error,
		})?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content, path)
	}

	/// Load `devtools.toml` from `root`, falling back to defaults when absent.
	pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
		let path = root.as_ref().join(CONFIG_FILE_NAME);
		if path.is_file() {
			Self::load(&path)
		} else {
			Ok(Self::default())
		}
	}

	fn validate(&self) -> Result<()> {
		if self.simulator.waiting_interval_ms == 0 {
			return Err(ConfigError::ZeroInterval("waiting-interval-ms"));
		}
		if self.simulator.connected_interval_ms == 0 {
			return Err(ConfigError::ZeroInterval("connected-interval-ms"));
		}
		Ok(())
	}
}

/// Resolves a configured path against the project root.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		root.join(path)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_is_default() {
		let config = DevtoolsConfig::parse("", Path::new("devtools.toml")).unwrap();
		assert_eq!(config, DevtoolsConfig::default());
	}

	#[test]
	fn sections_override_individual_keys() {
		let input = r#"
			[version-info]
			protocol-symbol = ""

			[rename]
			roots = ["lib"]
			keep-test-marker = true

			[simulator]
			port = 8999
			command = ["java", "-jar", "simulator.jar"]
		"#;
		let config = DevtoolsConfig::parse(input, Path::new("devtools.toml")).unwrap();

		assert_eq!(config.version_info.protocol_symbol, "");
		assert_eq!(config.version_info.output, PathBuf::from("src/lib/kinetic_version_info.h"));
		assert_eq!(config.rename.roots, vec![PathBuf::from("lib")]);
		assert_eq!(config.rename.globs, RenameConfig::default().globs);
		assert!(config.rename.keep_test_marker);
		assert_eq!(config.simulator.port, 8999);
		assert_eq!(
			config.simulator.command.as_deref(),
			Some(&["java".to_string(), "-jar".to_string(), "simulator.jar".to_string()][..])
		);
		assert_eq!(config.simulator.waiting_interval(), Duration::from_millis(250));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = DevtoolsConfig::parse("[mocks]\nplugins = []\n", Path::new("x.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Parse { .. }));
	}

	#[test]
	fn zero_interval_is_rejected() {
		let err = DevtoolsConfig::parse("[simulator]\nconnected-interval-ms = 0\n", Path::new("x.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::ZeroInterval("connected-interval-ms")));
	}

	#[test]
	fn discover_without_file_uses_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = DevtoolsConfig::discover(dir.path()).unwrap();
		assert_eq!(config, DevtoolsConfig::default());
	}

	#[test]
	fn discover_reads_project_file() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[mocks]\noutput-dir = \"out/mocks\"\n").unwrap();

		let config = DevtoolsConfig::discover(dir.path()).unwrap();
		assert_eq!(config.mocks.output_dir, PathBuf::from("out/mocks"));
	}

	#[test]
	fn resolve_keeps_absolute_paths() {
		let root = Path::new("/project");
		assert_eq!(resolve_path(root, Path::new("src/lib")), PathBuf::from("/project/src/lib"));
		assert_eq!(resolve_path(root, Path::new("/abs/out")), PathBuf::from("/abs/out"));
	}
}
